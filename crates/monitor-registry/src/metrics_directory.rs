//! Directory that hands out `metrics` handles.
//!
//! Storage lives in a `metrics_util` [`Registry`] with atomic storage, keyed by
//! the identifier string. Handles for the same identifier share one atomic, so
//! increments through any handle are visible through all of them.

use crate::directory::MonitorDirectory;
use crate::errors::DirectoryError;
use crate::identifier::Identifier;
use metrics::{Counter, Gauge, Histogram, Key};
use metrics_util::registry::{AtomicStorage, Registry};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Shared storage for every metric kind.
pub type MetricStorage = Registry<Key, AtomicStorage>;

/// A `metrics` handle type that can be looked up in [`MetricStorage`].
pub trait MetricHandle: Sized {
    /// Return the handle for `key`, registering storage on first use.
    fn get_or_create(storage: &MetricStorage, key: &Key) -> Self;

    /// Number of keys of this kind in `storage`.
    fn registered(storage: &MetricStorage) -> usize;
}

impl MetricHandle for Counter {
    fn get_or_create(storage: &MetricStorage, key: &Key) -> Self {
        storage.get_or_create_counter(key, |c| Counter::from_arc(Arc::clone(c)))
    }

    fn registered(storage: &MetricStorage) -> usize {
        storage.get_counter_handles().len()
    }
}

impl MetricHandle for Gauge {
    fn get_or_create(storage: &MetricStorage, key: &Key) -> Self {
        storage.get_or_create_gauge(key, |g| Gauge::from_arc(Arc::clone(g)))
    }

    fn registered(storage: &MetricStorage) -> usize {
        storage.get_gauge_handles().len()
    }
}

impl MetricHandle for Histogram {
    fn get_or_create(storage: &MetricStorage, key: &Key) -> Self {
        storage.get_or_create_histogram(key, |h| Histogram::from_arc(Arc::clone(h)))
    }

    fn registered(storage: &MetricStorage) -> usize {
        storage.get_histogram_handles().len()
    }
}

/// Directory of `metrics` handles of kind `H`.
pub struct MetricsDirectory<H> {
    storage: Arc<MetricStorage>,
    _handle: PhantomData<fn() -> H>,
}

impl<H: MetricHandle> MetricsDirectory<H> {
    /// Create a directory with its own empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(Arc::new(Registry::new(AtomicStorage)))
    }

    /// Create a directory over existing storage.
    #[must_use]
    pub fn with_storage(storage: Arc<MetricStorage>) -> Self {
        Self {
            storage,
            _handle: PhantomData,
        }
    }

    /// A directory for another handle kind over the same storage.
    #[must_use]
    pub fn view<H2: MetricHandle>(&self) -> MetricsDirectory<H2> {
        MetricsDirectory::with_storage(Arc::clone(&self.storage))
    }

    /// The shared storage.
    #[must_use]
    pub fn storage(&self) -> &Arc<MetricStorage> {
        &self.storage
    }

    /// Number of handles of kind `H` registered.
    #[must_use]
    pub fn len(&self) -> usize {
        H::registered(&self.storage)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current value of the counter registered under `identifier`.
    #[must_use]
    pub fn counter_value(&self, identifier: &Identifier) -> Option<u64> {
        self.storage
            .get_counter_handles()
            .get(&key_for(identifier))
            .map(|c| c.load(Ordering::Acquire))
    }

    /// Current value of the gauge registered under `identifier`.
    #[must_use]
    pub fn gauge_value(&self, identifier: &Identifier) -> Option<f64> {
        self.storage
            .get_gauge_handles()
            .get(&key_for(identifier))
            .map(|g| f64::from_bits(g.load(Ordering::Acquire)))
    }

    /// Samples recorded by the histogram registered under `identifier`.
    #[must_use]
    pub fn histogram_samples(&self, identifier: &Identifier) -> Option<Vec<f64>> {
        self.storage
            .get_histogram_handles()
            .get(&key_for(identifier))
            .map(|h| h.data())
    }
}

impl<H: MetricHandle> Default for MetricsDirectory<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for MetricsDirectory<H> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            _handle: PhantomData,
        }
    }
}

impl<H> fmt::Debug for MetricsDirectory<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsDirectory")
            .field("handle", &std::any::type_name::<H>())
            .finish_non_exhaustive()
    }
}

impl<H: MetricHandle> MonitorDirectory for MetricsDirectory<H> {
    type Monitor = H;

    fn get_or_create(&self, identifier: &Identifier) -> Result<H, DirectoryError> {
        Ok(H::get_or_create(&self.storage, &key_for(identifier)))
    }
}

fn key_for(identifier: &Identifier) -> Key {
    Key::from_name(identifier.as_str().to_owned())
}

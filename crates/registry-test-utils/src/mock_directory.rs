//! Recording directory for registry tests.
//!
//! Every identifier passed to `get_or_create` is appended to a request log,
//! so tests can assert exactly which names a registry asked for. Monitors
//! are `MockMonitor` values numbered in creation order.

use monitor_registry::{DirectoryError, Identifier, MonitorDirectory};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Monitor handed out by [`MockDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockMonitor {
    /// Identifier the monitor was created for.
    pub identifier: String,
    /// Creation order, starting at 0.
    pub serial: usize,
}

/// Mock directory for testing registry lookups.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    inner: Arc<Mutex<MockDirectoryInner>>,
}

#[derive(Debug, Default)]
struct MockDirectoryInner {
    /// Every identifier requested, in call order
    requests: Vec<String>,
    /// Created monitors by identifier
    monitors: HashMap<String, Arc<MockMonitor>>,
    /// Identifiers that fail on lookup
    failing: HashSet<String>,
    /// Fail every lookup
    unavailable: Option<String>,
}

impl MockDirectory {
    /// Create a new empty MockDirectory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail lookups of `identifier` with `DirectoryError::Unavailable`.
    #[must_use]
    pub fn failing_on(self, identifier: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .failing
            .insert(identifier.to_string());
        self
    }

    /// Fail every lookup with `DirectoryError::Unavailable(reason)`.
    #[must_use]
    pub fn unavailable(self, reason: &str) -> Self {
        self.inner.lock().unwrap().unavailable = Some(reason.to_string());
        self
    }

    /// Identifiers requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// The most recent identifier requested.
    pub fn last_request(&self) -> Option<String> {
        self.inner.lock().unwrap().requests.last().cloned()
    }

    /// Number of distinct monitors created.
    pub fn created(&self) -> usize {
        self.inner.lock().unwrap().monitors.len()
    }

    /// Assert that exactly `expected` was requested, in order.
    pub fn assert_requests(&self, expected: &[&str]) {
        let requests = self.requests();
        assert_eq!(
            requests, expected,
            "MockDirectory saw {requests:?}, expected {expected:?}"
        );
    }
}

impl MonitorDirectory for MockDirectory {
    type Monitor = Arc<MockMonitor>;

    fn get_or_create(&self, identifier: &Identifier) -> Result<Arc<MockMonitor>, DirectoryError> {
        let mut inner = self.inner.lock().map_err(|_| DirectoryError::Poisoned)?;
        let key = identifier.to_string();
        inner.requests.push(key.clone());

        if let Some(reason) = &inner.unavailable {
            return Err(DirectoryError::Unavailable(reason.clone()));
        }
        if inner.failing.contains(&key) {
            return Err(DirectoryError::Unavailable(format!("injected failure for {key}")));
        }

        let serial = inner.monitors.len();
        let monitor = inner
            .monitors
            .entry(key.clone())
            .or_insert_with(|| {
                Arc::new(MockMonitor {
                    identifier: key,
                    serial,
                })
            })
            .clone();
        Ok(monitor)
    }
}

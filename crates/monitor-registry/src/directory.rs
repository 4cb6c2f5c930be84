//! Directory collaborators that own monitor instances.
//!
//! A directory maps an [`Identifier`] to a monitor, creating and registering
//! the monitor the first time the identifier is requested. Implementations
//! must be idempotent per identifier: once a monitor exists, every later
//! request for the same identifier returns that monitor.

use crate::errors::DirectoryError;
use crate::identifier::Identifier;
use common::error::BoxedCause;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Get-or-create access to monitors keyed by identifier.
pub trait MonitorDirectory {
    /// Handle returned to callers.
    type Monitor;

    /// Return the monitor registered under `identifier`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Implementation specific; the registry propagates these unchanged.
    fn get_or_create(&self, identifier: &Identifier) -> Result<Self::Monitor, DirectoryError>;
}

impl<D: MonitorDirectory + ?Sized> MonitorDirectory for &D {
    type Monitor = D::Monitor;

    fn get_or_create(&self, identifier: &Identifier) -> Result<Self::Monitor, DirectoryError> {
        (**self).get_or_create(identifier)
    }
}

impl<D: MonitorDirectory + ?Sized> MonitorDirectory for Arc<D> {
    type Monitor = D::Monitor;

    fn get_or_create(&self, identifier: &Identifier) -> Result<Self::Monitor, DirectoryError> {
        (**self).get_or_create(identifier)
    }
}

type Factory<M> = dyn Fn(&Identifier) -> Result<M, BoxedCause> + Send + Sync;

/// In-process directory backed by a `HashMap`.
///
/// Monitors are built by a factory closure and shared as `Arc<M>`. When two
/// threads race to create the same identifier only one factory result is
/// kept; both callers receive it.
pub struct InMemoryDirectory<M> {
    monitors: RwLock<HashMap<String, Arc<M>>>,
    factory: Box<Factory<M>>,
}

impl<M> InMemoryDirectory<M> {
    /// Create a directory whose factory cannot fail.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&Identifier) -> M + Send + Sync + 'static,
    {
        Self::try_new(move |id| Ok(factory(id)))
    }

    /// Create a directory whose factory may refuse to build a monitor.
    pub fn try_new<F>(factory: F) -> Self
    where
        F: Fn(&Identifier) -> Result<M, BoxedCause> + Send + Sync + 'static,
    {
        Self {
            monitors: RwLock::new(HashMap::new()),
            factory: Box::new(factory),
        }
    }

    /// Number of registered monitors.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Poisoned` if the lock was poisoned.
    pub fn len(&self) -> Result<usize, DirectoryError> {
        Ok(self
            .monitors
            .read()
            .map_err(|_| DirectoryError::Poisoned)?
            .len())
    }

    /// Whether no monitor has been registered yet.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Poisoned` if the lock was poisoned.
    pub fn is_empty(&self) -> Result<bool, DirectoryError> {
        Ok(self.len()? == 0)
    }

    /// Whether a monitor exists for `identifier`. Never creates one.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Poisoned` if the lock was poisoned.
    pub fn contains(&self, identifier: &Identifier) -> Result<bool, DirectoryError> {
        Ok(self
            .monitors
            .read()
            .map_err(|_| DirectoryError::Poisoned)?
            .contains_key(identifier.as_str()))
    }

    /// Registered identifiers, sorted.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Poisoned` if the lock was poisoned.
    pub fn identifiers(&self) -> Result<Vec<String>, DirectoryError> {
        let mut ids: Vec<String> = self
            .monitors
            .read()
            .map_err(|_| DirectoryError::Poisoned)?
            .keys()
            .cloned()
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl<M> MonitorDirectory for InMemoryDirectory<M> {
    type Monitor = Arc<M>;

    fn get_or_create(&self, identifier: &Identifier) -> Result<Arc<M>, DirectoryError> {
        // Fast path: read lock only
        if let Some(monitor) = self
            .monitors
            .read()
            .map_err(|_| DirectoryError::Poisoned)?
            .get(identifier.as_str())
        {
            return Ok(Arc::clone(monitor));
        }

        let mut monitors = self.monitors.write().map_err(|_| DirectoryError::Poisoned)?;
        // Another caller may have created it while we waited for the write lock
        if let Some(monitor) = monitors.get(identifier.as_str()) {
            return Ok(Arc::clone(monitor));
        }

        let monitor = (self.factory)(identifier).map_err(|source| DirectoryError::Create {
            identifier: identifier.to_string(),
            source,
        })?;
        let monitor = Arc::new(monitor);
        monitors.insert(identifier.to_string(), Arc::clone(&monitor));

        debug!(identifier = %identifier, "Registered new monitor");
        Ok(monitor)
    }
}

impl<M> fmt::Debug for InMemoryDirectory<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.monitors.read().map(|m| m.len()).ok();
        f.debug_struct("InMemoryDirectory")
            .field("monitors", &len)
            .field("factory", &"<fn>")
            .finish()
    }
}

//! Monitor registry.
//!
//! Hands out monitor handles keyed by a canonical identifier. Callers pass a
//! set of labels; the registry merges them with its constant labels, sorts and
//! deduplicates the result, and asks a [`MonitorDirectory`] for the monitor
//! registered under that name, creating it on first use.
//!
//! ```rust
//! use monitor_registry::{InMemoryDirectory, MonitorKind, NamespaceRegistry};
//!
//! struct RequestStats;
//!
//! let directory = InMemoryDirectory::new(|_id| RequestStats);
//! let registry = NamespaceRegistry::with_instance_id(
//!     MonitorKind::new("RequestStats", "app.stats.RequestStats"),
//!     directory,
//!     ["colo1"],
//!     "7",
//! );
//!
//! let id = registry.identifier_for(["login", "api"]);
//! assert_eq!(
//!     id.as_str(),
//!     "RequestStats:namespace=api|colo1|login,type=app.stats.RequestStats,id=7"
//! );
//! ```

#![warn(clippy::pedantic)]

pub mod directory;
pub mod errors;
pub mod identifier;
pub mod metrics_directory;
pub mod observability;
pub mod registry;

pub use common::error::TypeFormatError;
pub use common::types::InstanceId;
pub use directory::{InMemoryDirectory, MonitorDirectory};
pub use errors::{DirectoryError, RegistryError};
pub use identifier::{Identifier, MonitorKind};
pub use metrics_directory::{MetricHandle, MetricsDirectory};
pub use registry::NamespaceRegistry;

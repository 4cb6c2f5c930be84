//! # Registry Test Utilities
//!
//! Shared test utilities for the monitor registry.
//!
//! - `mock_directory` - recording directory with failure injection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registry_test_utils::MockDirectory;
//!
//! let directory = MockDirectory::new();
//! let registry = NamespaceRegistry::new(kind, directory.clone(), ["colo1"]);
//!
//! registry.get_monitor(["api"])?;
//! assert_eq!(directory.requests().len(), 1);
//! ```

pub mod mock_directory;

pub use mock_directory::*;

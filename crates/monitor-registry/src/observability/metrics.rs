//! Metrics definitions for the monitor registry
//!
//! All metrics follow Prometheus naming conventions:
//! - `monitor_registry_` prefix
//! - `_total` suffix for counters

use metrics::counter;
use std::fmt;

/// Counter of lookups, labelled by path and status.
pub const LOOKUPS_TOTAL: &str = "monitor_registry_lookups_total";

/// Counter of directory failures, labelled by path.
pub const DIRECTORY_ERRORS_TOTAL: &str = "monitor_registry_directory_errors_total";

/// Which registry entry point served a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPath {
    /// `get_monitor` with caller labels
    Namespace,
    /// Deprecated `get_host_monitor`
    Host,
}

impl LookupPath {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LookupPath::Namespace => "namespace",
            LookupPath::Host => "host",
        }
    }
}

impl fmt::Display for LookupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record a completed lookup
///
/// Metric: `monitor_registry_lookups_total`
/// Labels: `path`, `status`
pub fn record_lookup(path: LookupPath, status: &str) {
    counter!(LOOKUPS_TOTAL, "path" => path.as_str(), "status" => status.to_string()).increment(1);
}

/// Record a directory failure
///
/// Metric: `monitor_registry_directory_errors_total`
/// Labels: `path`
pub fn record_directory_error(path: LookupPath) {
    counter!(DIRECTORY_ERRORS_TOTAL, "path" => path.as_str()).increment(1);
}

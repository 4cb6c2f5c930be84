//! Observability module for the monitor registry
//!
//! The registry reports its own lookups through the `metrics` facade. With no
//! recorder installed these calls are no-ops.
//!
//! # Metrics
//!
//! | Metric | Type | Labels | Purpose |
//! |--------|------|--------|---------|
//! | `monitor_registry_lookups_total` | Counter | `path`, `status` | Lookups served by a registry |
//! | `monitor_registry_directory_errors_total` | Counter | `path` | Lookups the directory rejected |
//!
//! Labels are bounded: `path` is `namespace` or `host`, `status` is
//! `success` or `error`.

pub mod metrics;

pub use metrics::{record_directory_error, record_lookup, LookupPath};

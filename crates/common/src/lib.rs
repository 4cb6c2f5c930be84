//! Common utilities and types shared across the monitor registry crates.

#![warn(clippy::pedantic)]

/// Module for common error types
pub mod error;

/// Module for common data types
pub mod types;

/// Module for typed configuration values
pub mod config;

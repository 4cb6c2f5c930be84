//! Typed configuration values for monitor registry components.
//!
//! Values are read from environment variables (or a `HashMap` in tests) and
//! converted on access. Every conversion failure is a [`TypeFormatError`]
//! annotated with the key that held the bad value.

use crate::error::TypeFormatError;
use crate::types::InstanceId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::env;
use std::error::Error as StdError;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Comma-separated labels merged into every monitor lookup.
pub const ENV_CONSTANT_LABELS: &str = "MONITOR_CONSTANT_LABELS";

/// Explicit instance id for the registry.
pub const ENV_INSTANCE_ID: &str = "MONITOR_INSTANCE_ID";

/// Optional host label appended to the constant labels.
pub const ENV_HOST_LABEL: &str = "MONITOR_HOST_LABEL";

/// Whether the registry records its own lookup metrics.
pub const ENV_METRICS_ENABLED: &str = "MONITOR_METRICS_ENABLED";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidValue(#[from] TypeFormatError),
}

/// A snapshot of raw configuration values with typed accessors.
#[derive(Debug, Clone, Default)]
pub struct ConfigValues {
    vars: HashMap<String, String>,
}

impl ConfigValues {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    /// Build from a `HashMap` (for testing).
    #[must_use]
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        Self { vars: vars.clone() }
    }

    /// Raw string value, if present.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Parse a value with its `FromStr` implementation.
    ///
    /// Absent keys yield `Ok(None)`. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns a `TypeFormatError` carrying `key` if the value does not parse.
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>, TypeFormatError>
    where
        T: FromStr,
        T::Err: StdError + Send + Sync + 'static,
    {
        self.get_str(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|e| TypeFormatError::from_cause(e).with_key(key))
            })
            .transpose()
    }

    /// Parse a boolean flag.
    ///
    /// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns a `TypeFormatError` carrying `key` for any other value.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, TypeFormatError> {
        self.get_str(key)
            .map(|raw| parse_bool(raw).map_err(|e| e.with_key(key)))
            .transpose()
    }

    /// Parse a whole number of seconds.
    ///
    /// # Errors
    ///
    /// Returns a `TypeFormatError` carrying `key` if the value is not a
    /// non-negative integer.
    pub fn get_duration_secs(&self, key: &str) -> Result<Option<Duration>, TypeFormatError> {
        Ok(self.get_parsed::<u64>(key)?.map(Duration::from_secs))
    }

    /// Split a comma-separated value into trimmed, non-empty entries.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get_str(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn parse_bool(raw: &str) -> Result<bool, TypeFormatError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(TypeFormatError::new(format!(
            "expected a boolean, got '{other}'"
        ))),
    }
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Labels merged into every lookup
    pub constant_labels: BTreeSet<String>,
    /// Explicit instance id; generated at construction when `None`
    pub instance_id: Option<InstanceId>,
    /// Record lookup metrics through the `metrics` facade
    pub metrics_enabled: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            constant_labels: BTreeSet::new(),
            instance_id: None,
            metrics_enabled: true,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// See [`RegistryConfig::from_values`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(&ConfigValues::from_env())
    }

    /// Load configuration from a `HashMap` (for testing)
    ///
    /// # Errors
    ///
    /// See [`RegistryConfig::from_values`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_values(&ConfigValues::from_vars(vars))
    }

    /// Load configuration from captured values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `MONITOR_METRICS_ENABLED` is
    /// not a boolean.
    pub fn from_values(values: &ConfigValues) -> Result<Self, ConfigError> {
        let mut constant_labels: BTreeSet<String> =
            values.get_list(ENV_CONSTANT_LABELS).into_iter().collect();

        if let Some(host) = values
            .get_str(ENV_HOST_LABEL)
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            constant_labels.insert(host.to_string());
        }

        let instance_id = values
            .get_str(ENV_INSTANCE_ID)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(InstanceId::from);

        let metrics_enabled = values.get_bool(ENV_METRICS_ENABLED)?.unwrap_or(true);

        tracing::debug!(
            constant_labels = constant_labels.len(),
            explicit_instance_id = instance_id.is_some(),
            metrics_enabled,
            "Loaded registry configuration"
        );

        Ok(Self {
            constant_labels,
            instance_id,
            metrics_enabled,
        })
    }
}

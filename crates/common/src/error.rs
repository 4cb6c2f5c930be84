//! Common error types for the monitor registry crates.

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error used as the cause of a [`TypeFormatError`].
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// A configuration value could not be converted to the requested type.
///
/// The key is attached by value at the site that knows it (usually the config
/// lookup), so a rendered message is always final:
///
/// ```rust
/// use common::error::TypeFormatError;
///
/// let err = TypeFormatError::new("must be positive").with_key("timeout");
/// assert_eq!(err.to_string(), "Invalid key 'timeout' value. must be positive");
///
/// let unkeyed = TypeFormatError::new("must be positive");
/// assert_eq!(unkeyed.to_string(), "Invalid key 'null' value. must be positive");
/// ```
#[derive(Debug, Error)]
#[error("Invalid key '{}' value. {}", .key_name.as_deref().unwrap_or("null"), .message)]
pub struct TypeFormatError {
    key_name: Option<String>,
    message: String,
    #[source]
    source: Option<BoxedCause>,
}

impl TypeFormatError {
    /// Create an error that does not yet know which key it belongs to.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            key_name: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping the parser failure that caused it.
    ///
    /// The cause's own message becomes the error message.
    pub fn from_cause<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            key_name: None,
            message: cause.to_string(),
            source: Some(Box::new(cause)),
        }
    }

    /// Create an error with an explicit message and an underlying cause.
    pub fn with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            key_name: None,
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// Annotate the error with the configuration key it was raised for.
    #[must_use]
    pub fn with_key(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    /// The configuration key, if one was attached.
    #[must_use]
    pub fn key_name(&self) -> Option<&str> {
        self.key_name.as_deref()
    }

    /// The original message, without the key prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type alias using `TypeFormatError`
pub type Result<T> = std::result::Result<T, TypeFormatError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_includes_key() {
        let err = TypeFormatError::new("must be positive").with_key("timeout");

        assert_eq!(
            err.to_string(),
            "Invalid key 'timeout' value. must be positive"
        );
        assert_eq!(err.key_name(), Some("timeout"));
        assert_eq!(err.message(), "must be positive");
    }

    #[test]
    fn test_message_without_key_renders_null() {
        let err = TypeFormatError::new("must be positive");

        assert_eq!(err.to_string(), "Invalid key 'null' value. must be positive");
        assert_eq!(err.key_name(), None);
    }

    #[test]
    fn test_with_key_replaces_previous_key() {
        let err = TypeFormatError::new("bad").with_key("a").with_key("b");
        assert_eq!(err.to_string(), "Invalid key 'b' value. bad");
    }

    #[test]
    fn test_from_cause_keeps_source() {
        let cause = "abc".parse::<u32>().unwrap_err();
        let expected = cause.to_string();

        let err = TypeFormatError::from_cause(cause).with_key("port");

        assert_eq!(err.message(), expected);
        assert_eq!(err.to_string(), format!("Invalid key 'port' value. {expected}"));
        let source = err.source().map(ToString::to_string);
        assert_eq!(source, Some(expected));
    }

    #[test]
    fn test_with_cause_uses_explicit_message() {
        let cause = "x".parse::<f64>().unwrap_err();
        let err = TypeFormatError::with_cause("expected a number", cause);

        assert_eq!(err.to_string(), "Invalid key 'null' value. expected a number");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_new_has_no_source() {
        let err = TypeFormatError::new("plain");
        assert!(err.source().is_none());
    }
}

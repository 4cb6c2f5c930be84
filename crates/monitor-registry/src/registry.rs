//! Namespace registry.
//!
//! Builds canonical identifiers from caller labels plus a fixed set of
//! constant labels, then asks the directory for the monitor registered under
//! that identifier.

use crate::directory::MonitorDirectory;
use crate::errors::{RegistryError, Result};
use crate::identifier::{Identifier, MonitorKind};
use crate::observability::metrics::{record_directory_error, record_lookup, LookupPath};
use common::config::RegistryConfig;
use common::types::InstanceId;
use http::Uri;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Bean-name port used when a URI has no written port.
const UNKNOWN_PORT: &str = "-1";

/// Hands out monitors of one kind keyed by a sorted label namespace.
///
/// Holds no mutable state after construction. Safe to share across threads
/// whenever the directory is.
#[derive(Debug)]
pub struct NamespaceRegistry<D> {
    kind: MonitorKind,
    directory: D,
    constant_labels: BTreeSet<String>,
    instance_id: InstanceId,
    metrics_enabled: bool,
}

impl<D: MonitorDirectory> NamespaceRegistry<D> {
    /// Create a registry with a freshly generated instance id.
    pub fn new<I, S>(kind: MonitorKind, directory: D, constant_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_instance_id(kind, directory, constant_labels, InstanceId::generate())
    }

    /// Create a registry with an explicit instance id.
    pub fn with_instance_id<I, S>(
        kind: MonitorKind,
        directory: D,
        constant_labels: I,
        instance_id: impl Into<InstanceId>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let constant_labels: BTreeSet<String> =
            constant_labels.into_iter().map(Into::into).collect();
        let instance_id = instance_id.into();

        debug!(
            type_name = kind.type_name(),
            instance_id = %instance_id,
            constant_labels = constant_labels.len(),
            "Created namespace registry"
        );

        Self {
            kind,
            directory,
            constant_labels,
            instance_id,
            metrics_enabled: true,
        }
    }

    /// Create a registry from loaded configuration.
    pub fn from_config(kind: MonitorKind, directory: D, config: &RegistryConfig) -> Self {
        let instance_id = config
            .instance_id
            .clone()
            .unwrap_or_else(InstanceId::generate);

        Self::with_instance_id(
            kind,
            directory,
            config.constant_labels.iter().cloned(),
            instance_id,
        )
        .with_metrics(config.metrics_enabled)
    }

    /// Enable or disable lookup metrics.
    #[must_use]
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    #[must_use]
    pub fn kind(&self) -> &MonitorKind {
        &self.kind
    }

    #[must_use]
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    #[must_use]
    pub fn constant_labels(&self) -> &BTreeSet<String> {
        &self.constant_labels
    }

    #[must_use]
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Compose the identifier `get_monitor` would look up for `labels`.
    ///
    /// Labels are merged with the constant labels, deduplicated and sorted, so
    /// input order and repetition never change the result.
    pub fn identifier_for<I, S>(&self, labels: I) -> Identifier
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut namespace: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_owned())
            .collect();
        namespace.extend(self.constant_labels.iter().cloned());

        Identifier::namespaced(&self.kind, &namespace, &self.instance_id)
    }

    /// Return the monitor for `labels`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Directory` with the directory's error when the
    /// directory fails.
    pub fn get_monitor<I, S>(&self, labels: I) -> Result<D::Monitor>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let identifier = self.identifier_for(labels);
        self.lookup(&identifier, LookupPath::Namespace)
    }

    /// Return the monitor for the host addressed by `uri`.
    ///
    /// The bean name is `<scheme>-<host>-<port>`, with scheme and host kept
    /// as written. A URI without an explicit port uses `-1`; scheme default
    /// ports are never filled in.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidUri`, `RegistryError::MissingHost` or
    /// `RegistryError::MissingScheme` for unusable URIs, and
    /// `RegistryError::Directory` when the directory fails.
    #[deprecated(note = "use get_monitor with explicit labels")]
    pub fn get_host_monitor(&self, uri: &str) -> Result<D::Monitor> {
        let identifier = self.host_identifier(uri)?;
        self.lookup(&identifier, LookupPath::Host)
    }

    /// Compose the identifier `get_host_monitor` would look up for `uri`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidUri`, `RegistryError::MissingHost` or
    /// `RegistryError::MissingScheme` for unusable URIs.
    #[deprecated(note = "use identifier_for with explicit labels")]
    pub fn host_identifier_for(&self, uri: &str) -> Result<Identifier> {
        self.host_identifier(uri)
    }

    fn host_identifier(&self, uri: &str) -> Result<Identifier> {
        let bean_name = host_bean_name(uri)?;
        Ok(Identifier::host(&self.kind, &bean_name))
    }

    fn lookup(&self, identifier: &Identifier, path: LookupPath) -> Result<D::Monitor> {
        debug!(identifier = %identifier, path = %path, "Resolving monitor");

        match self.directory.get_or_create(identifier) {
            Ok(monitor) => {
                if self.metrics_enabled {
                    record_lookup(path, "success");
                }
                Ok(monitor)
            }
            Err(e) => {
                warn!(identifier = %identifier, path = %path, error = %e, "Directory lookup failed");
                if self.metrics_enabled {
                    record_lookup(path, "error");
                    record_directory_error(path);
                }
                Err(RegistryError::Directory(e))
            }
        }
    }
}

fn host_bean_name(uri: &str) -> Result<String> {
    let parsed: Uri = uri.parse().map_err(|source| RegistryError::InvalidUri {
        uri: uri.to_string(),
        source,
    })?;

    let host = parsed
        .host()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| RegistryError::MissingHost(uri.to_string()))?;

    let scheme = parsed
        .scheme_str()
        .ok_or_else(|| RegistryError::MissingScheme(uri.to_string()))?;

    // Only a written port counts; default ports stay unknown
    let port = parsed
        .port_u16()
        .map_or_else(|| UNKNOWN_PORT.to_string(), |p| p.to_string());

    Ok(format!("{scheme}-{host}-{port}"))
}

#[cfg(test)]
#[allow(deprecated, clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::errors::DirectoryError;
    use std::sync::Arc;

    fn registry(constant: &[&str]) -> NamespaceRegistry<InMemoryDirectory<String>> {
        NamespaceRegistry::with_instance_id(
            MonitorKind::new("Stats", "app.Stats"),
            InMemoryDirectory::new(|id| id.to_string()),
            constant.iter().copied(),
            "9",
        )
    }

    #[test]
    fn test_identifier_format() {
        let registry = registry(&["colo1"]);
        let id = registry.identifier_for(["login", "api"]);

        assert_eq!(
            id.as_str(),
            "Stats:namespace=api|colo1|login,type=app.Stats,id=9"
        );
    }

    #[test]
    fn test_identifier_order_independent() {
        let registry = registry(&[]);

        let a = registry.identifier_for(["x", "y", "z"]);
        let b = registry.identifier_for(["z", "x", "y"]);
        let c = registry.identifier_for(vec!["y".to_string(), "z".to_string(), "x".to_string()]);

        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_duplicates_collapse_with_constant_labels() {
        let registry = registry(&["colo1", "web"]);
        let id = registry.identifier_for(["web", "api", "api", "colo1"]);

        assert_eq!(
            id.as_str(),
            "Stats:namespace=api|colo1|web,type=app.Stats,id=9"
        );
    }

    #[test]
    fn test_get_monitor_returns_same_instance() {
        let registry = registry(&["c"]);

        let first = registry.get_monitor(["a", "b"]).expect("first");
        let second = registry.get_monitor(["b", "a", "a"]).expect("second");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, "Stats:namespace=a|b|c,type=app.Stats,id=9");
    }

    #[test]
    fn test_instance_id_stable_across_calls() {
        let registry = NamespaceRegistry::new(
            MonitorKind::new("Stats", "app.Stats"),
            InMemoryDirectory::new(|_| ()),
            Vec::<String>::new(),
        );

        let before = registry.instance_id().clone();
        let a = registry.identifier_for(["a"]);
        let b = registry.identifier_for(["a"]);

        assert_eq!(a, b);
        assert_eq!(registry.instance_id(), &before);
        assert!(a.as_str().ends_with(&format!(",id={before}")));
    }

    #[test]
    fn test_separate_registries_get_separate_ids() {
        let kind = MonitorKind::new("Stats", "app.Stats");
        let one = NamespaceRegistry::new(kind.clone(), InMemoryDirectory::new(|_| ()), ["x"]);
        let two = NamespaceRegistry::new(kind, InMemoryDirectory::new(|_| ()), ["x"]);

        assert_ne!(one.identifier_for(["a"]), two.identifier_for(["a"]));
    }

    #[test]
    fn test_directory_error_propagates() {
        let registry = NamespaceRegistry::with_instance_id(
            MonitorKind::new("Stats", "app.Stats"),
            InMemoryDirectory::<()>::try_new(|_| Err("no capacity".into())),
            ["c"],
            "1",
        )
        .with_metrics(false);

        let result = registry.get_monitor(["a"]);
        assert!(matches!(
            result,
            Err(RegistryError::Directory(DirectoryError::Create { .. }))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = RegistryConfig {
            constant_labels: ["colo1".to_string()].into_iter().collect(),
            instance_id: Some(InstanceId::from("cfg")),
            metrics_enabled: false,
        };
        let registry = NamespaceRegistry::from_config(
            MonitorKind::new("Stats", "app.Stats"),
            InMemoryDirectory::new(|_| ()),
            &config,
        );

        assert_eq!(registry.instance_id().as_str(), "cfg");
        assert_eq!(
            registry.identifier_for(["a"]).as_str(),
            "Stats:namespace=a|colo1,type=app.Stats,id=cfg"
        );
    }

    #[test]
    fn test_host_identifier_format() {
        let registry = registry(&[]);
        let id = registry
            .host_identifier_for("http://example.com:8080/path")
            .expect("valid uri");

        assert_eq!(
            id.as_str(),
            "Stats:category=hostname,type=app.Stats,name=http-example.com-8080"
        );
    }

    #[test]
    fn test_host_identifiers_differ_by_scheme_and_port() {
        let registry = registry(&[]);

        let http = registry.host_identifier_for("http://host:80").expect("http");
        let https = registry.host_identifier_for("https://host:443").expect("https");

        assert_ne!(http, https);
        assert!(http.as_str().ends_with("name=http-host-80"));
        assert!(https.as_str().ends_with("name=https-host-443"));
    }

    #[test]
    fn test_host_without_port_uses_unknown_port() {
        let registry = registry(&[]);

        let bare = registry.host_identifier_for("http://host").expect("bare");
        let explicit = registry.host_identifier_for("http://host:80").expect("explicit");
        let custom = registry.host_identifier_for("custom://host").expect("custom");

        assert!(bare.as_str().ends_with("name=http-host--1"));
        assert!(explicit.as_str().ends_with("name=http-host-80"));
        assert!(custom.as_str().ends_with("name=custom-host--1"));
        assert_ne!(bare, explicit);
    }

    #[test]
    fn test_host_kept_as_written() {
        let registry = registry(&[]);
        let id = registry
            .host_identifier_for("http://Example.COM:8080")
            .expect("valid uri");

        assert!(id.as_str().ends_with("name=http-Example.COM-8080"));
    }

    #[test]
    fn test_host_invalid_uri() {
        let registry = registry(&[]);
        let result = registry.get_host_monitor("not a uri");
        assert!(matches!(result, Err(RegistryError::InvalidUri { .. })));
    }

    #[test]
    fn test_host_missing_scheme() {
        let registry = registry(&[]);
        let result = registry.get_host_monitor("example.com:8080");
        assert!(matches!(result, Err(RegistryError::MissingScheme(_))));
    }

    #[test]
    fn test_host_missing_host() {
        let registry = registry(&[]);
        let result = registry.get_host_monitor("/status");
        assert!(matches!(result, Err(RegistryError::MissingHost(_))));
    }

    #[test]
    fn test_host_and_namespace_lookups_share_directory() {
        let registry = registry(&[]);

        registry.get_monitor(["a"]).expect("namespace");
        registry.get_host_monitor("http://host:80").expect("host");

        assert_eq!(registry.directory().len().expect("len"), 2);
    }
}

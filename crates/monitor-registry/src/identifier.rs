//! Canonical monitor identifiers.
//!
//! Two shapes exist:
//!
//! | Shape | Format |
//! |-------|--------|
//! | Namespace | `<type>:namespace=<l1>\|<l2>...,type=<canonical>,id=<instance>` |
//! | Host (legacy) | `<type>:category=hostname,type=<canonical>,name=<bean>` |
//!
//! Namespace labels are always sorted and deduplicated before joining, so the
//! same label set yields the same identifier regardless of input order.

use common::types::InstanceId;
use std::collections::BTreeSet;
use std::fmt;

/// Separator between namespace labels.
pub const LABEL_SEPARATOR: &str = "|";

/// Category used by legacy host identifiers.
pub const HOST_CATEGORY: &str = "hostname";

/// The monitor type a registry hands out.
///
/// `type_name` is the identifier's leading segment; `canonical_name` is
/// written to the `type=` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonitorKind {
    type_name: String,
    canonical_name: String,
}

impl MonitorKind {
    /// Create a kind with explicit names.
    pub fn new(type_name: impl Into<String>, canonical_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            canonical_name: canonical_name.into(),
        }
    }

    /// Derive a kind from a Rust type.
    ///
    /// The canonical name is the full type path; the type name is its last
    /// path segment with generic arguments removed.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        let canonical = std::any::type_name::<T>();
        let base = canonical.split('<').next().unwrap_or(canonical);
        let short = base.rsplit("::").next().unwrap_or(base);
        Self::new(short, canonical)
    }

    /// Leading identifier segment.
    ///
    /// Legacy identifiers always led with `java.lang.Class`, whatever the
    /// monitor type; names built here lead with the monitor's own type name
    /// instead and will not match them.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }
}

/// A fully composed monitor name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Compose a namespace identifier.
    ///
    /// `namespace` is already sorted and unique by construction.
    #[must_use]
    pub fn namespaced(
        kind: &MonitorKind,
        namespace: &BTreeSet<String>,
        instance_id: &InstanceId,
    ) -> Self {
        let joined = namespace
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR);

        Self(format!(
            "{}:namespace={},type={},id={}",
            kind.type_name, joined, kind.canonical_name, instance_id
        ))
    }

    /// Compose a legacy host identifier for `bean_name`.
    #[must_use]
    pub fn host(kind: &MonitorKind, bean_name: &str) -> Self {
        Self(format!(
            "{}:category={},type={},name={}",
            kind.type_name, HOST_CATEGORY, kind.canonical_name, bean_name
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn kind() -> MonitorKind {
        MonitorKind::new("Stats", "app.Stats")
    }

    fn labels(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_namespaced_format() {
        let id = Identifier::namespaced(
            &kind(),
            &labels(&["b", "a", "c"]),
            &InstanceId::from("42"),
        );
        assert_eq!(id.as_str(), "Stats:namespace=a|b|c,type=app.Stats,id=42");
    }

    #[test]
    fn test_namespaced_empty_namespace() {
        let id = Identifier::namespaced(&kind(), &BTreeSet::new(), &InstanceId::from("1"));
        assert_eq!(id.as_str(), "Stats:namespace=,type=app.Stats,id=1");
    }

    #[test]
    fn test_labels_sort_bytewise() {
        // Uppercase sorts before lowercase
        let id = Identifier::namespaced(&kind(), &labels(&["b", "B", "a"]), &InstanceId::from("1"));
        assert_eq!(id.as_str(), "Stats:namespace=B|a|b,type=app.Stats,id=1");
    }

    #[test]
    fn test_host_format() {
        let id = Identifier::host(&kind(), "http-example.com-80");
        assert_eq!(
            id.as_str(),
            "Stats:category=hostname,type=app.Stats,name=http-example.com-80"
        );
    }

    #[test]
    fn test_kind_of_plain_type() {
        struct LatencyMonitor;
        let kind = MonitorKind::of::<LatencyMonitor>();

        assert_eq!(kind.type_name(), "LatencyMonitor");
        assert!(kind.canonical_name().ends_with("::LatencyMonitor"));
    }

    #[test]
    fn test_kind_of_generic_type_strips_arguments() {
        let kind = MonitorKind::of::<std::sync::Arc<String>>();

        assert_eq!(kind.type_name(), "Arc");
        assert_eq!(
            kind.canonical_name(),
            std::any::type_name::<std::sync::Arc<String>>()
        );
    }

    #[test]
    fn test_display_matches_as_str() {
        let id = Identifier::host(&kind(), "x");
        assert_eq!(id.to_string(), id.as_str());
        assert_eq!(String::from(id.clone()), id.into_string());
    }
}

//! Field merge policies.
//!
//! The policy table is data, not code: one row per known field key, naming
//! how values combine across the chain and what shape the final value must
//! have. Keys missing from the table are rejected by the engine.
//!
//! A few fields also accept a hyphenated alias (`no-route` for `no_route`).
//! Values are always stored under the canonical key.

use std::fmt;

use heir_types::{ByteQuantity, HealthCheckType, ScalarValue};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Field keys
// ---------------------------------------------------------------------------

pub const MEMORY: &str = "memory";
pub const DISK_QUOTA: &str = "disk_quota";
pub const INSTANCES: &str = "instances";
pub const BUILDPACK: &str = "buildpack";
pub const DOCKER_IMAGE: &str = "docker.image";
pub const DOCKER_USERNAME: &str = "docker.username";
pub const PATH: &str = "path";
pub const COMMAND: &str = "command";
pub const STACK: &str = "stack";
pub const HEALTH_CHECK_TYPE: &str = "health_check_type";
pub const HEALTH_CHECK_HTTP_ENDPOINT: &str = "health_check_http_endpoint";
pub const TIMEOUT: &str = "timeout";
pub const NO_ROUTE: &str = "no_route";
pub const RANDOM_ROUTE: &str = "random_route";
pub const ROUTES: &str = "routes";
pub const SERVICES: &str = "services";
pub const ENV: &str = "env";
pub const HOST: &str = "host";
pub const HOSTS: &str = "hosts";
pub const DOMAIN: &str = "domain";
pub const DOMAINS: &str = "domains";
pub const NO_HOSTNAME: &str = "no_hostname";
pub const APP_PORTS: &str = "app_ports";

// ---------------------------------------------------------------------------
// MergeKind / TypeHint
// ---------------------------------------------------------------------------

/// How successive values of one field combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeKind {
    /// Scalar: the last present value wins.
    Override,
    /// List: every present list is concatenated in sequence order.
    Append,
    /// Map: maps fold left-to-right, later keys overwrite earlier ones.
    KeyMerge,
}

impl MergeKind {
    /// The value shape this kind expects in a manifest.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Override => "scalar",
            Self::Append => "list",
            Self::KeyMerge => "map",
        }
    }
}

impl fmt::Display for MergeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shape())
    }
}

/// The type a scalar field must hold after merging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeHint {
    /// Non-negative integer, or decimal text.
    Integer,
    /// A byte quantity such as `512M` or `1G`.
    ByteQuantity,
    /// Free text.
    Text,
    /// `true`/`false`, as a boolean or text.
    Boolean,
    /// One of a fixed set of spellings.
    Enumerated(&'static [&'static str]),
    /// Filesystem path, relative to the declaring manifest.
    Path,
    /// TCP port, 1 to 65535.
    Port,
}

impl TypeHint {
    /// Check a non-null scalar against this hint.
    ///
    /// Returns a human readable reason on mismatch.
    pub fn check(&self, value: &ScalarValue) -> Result<(), String> {
        match self {
            Self::Integer => integer_value(value).map(|_| ()),
            Self::ByteQuantity => byte_quantity_value(value).map(|_| ()),
            Self::Text | Self::Path => text_value(value).map(|_| ()),
            Self::Boolean => boolean_value(value).map(|_| ()),
            Self::Port => port_value(value).map(|_| ()),
            Self::Enumerated(allowed) => {
                let text = text_value(value)?;
                if allowed.iter().any(|a| *a == text) {
                    Ok(())
                } else {
                    Err(format!(
                        "'{text}' is not one of: {}",
                        allowed.join(", ")
                    ))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Typed accessors
// ---------------------------------------------------------------------------

pub(crate) fn text_value(value: &ScalarValue) -> Result<&str, String> {
    value
        .as_text()
        .ok_or_else(|| format!("expected a string, found {}", value.type_name()))
}

pub(crate) fn integer_value(value: &ScalarValue) -> Result<i64, String> {
    match value {
        ScalarValue::Int(n) => Ok(*n),
        ScalarValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("'{s}' is not an integer")),
        other => Err(format!("expected an integer, found {}", other.type_name())),
    }
}

pub(crate) fn boolean_value(value: &ScalarValue) -> Result<bool, String> {
    match value {
        ScalarValue::Bool(b) => Ok(*b),
        ScalarValue::Text(s) if s == "true" => Ok(true),
        ScalarValue::Text(s) if s == "false" => Ok(false),
        other => Err(format!("expected true or false, found {other}")),
    }
}

pub(crate) fn port_value(value: &ScalarValue) -> Result<u16, String> {
    let n = integer_value(value)?;
    u16::try_from(n)
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| format!("{n} is not a port number"))
}

pub(crate) fn byte_quantity_value(value: &ScalarValue) -> Result<ByteQuantity, String> {
    let text = match value {
        ScalarValue::Text(s) => s.clone(),
        ScalarValue::Int(n) => n.to_string(),
        other => return Err(format!("expected a byte quantity, found {}", other.type_name())),
    };
    text.parse::<ByteQuantity>().map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// FieldPolicy / PolicyTable
// ---------------------------------------------------------------------------

/// Merge policy for one field key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldPolicy {
    pub key: &'static str,
    /// Alternative spelling accepted in manifests.
    pub alias: Option<&'static str>,
    pub kind: MergeKind,
    /// Type of a scalar's winning value, or of every list item. Unused for
    /// maps.
    pub hint: TypeHint,
    /// Whether `null` is an accepted value meaning "platform default".
    pub nullable: bool,
}

impl FieldPolicy {
    pub const fn scalar(key: &'static str, hint: TypeHint) -> Self {
        Self {
            key,
            alias: None,
            kind: MergeKind::Override,
            hint,
            nullable: false,
        }
    }

    pub const fn nullable(key: &'static str, hint: TypeHint) -> Self {
        Self {
            key,
            alias: None,
            kind: MergeKind::Override,
            hint,
            nullable: true,
        }
    }

    pub const fn list(key: &'static str) -> Self {
        Self {
            key,
            alias: None,
            kind: MergeKind::Append,
            hint: TypeHint::Text,
            nullable: false,
        }
    }

    /// A list whose items must match `hint`.
    pub const fn list_of(key: &'static str, hint: TypeHint) -> Self {
        Self {
            key,
            alias: None,
            kind: MergeKind::Append,
            hint,
            nullable: false,
        }
    }

    pub const fn with_alias(self, alias: &'static str) -> Self {
        Self {
            alias: Some(alias),
            ..self
        }
    }

    /// Whether `key` names this field.
    pub fn matches(&self, key: &str) -> bool {
        self.key == key || self.alias == Some(key)
    }

    pub const fn map(key: &'static str) -> Self {
        Self {
            key,
            alias: None,
            kind: MergeKind::KeyMerge,
            hint: TypeHint::Text,
            nullable: false,
        }
    }
}

static STANDARD: &[FieldPolicy] = &[
    FieldPolicy::scalar(MEMORY, TypeHint::ByteQuantity),
    FieldPolicy::scalar(DISK_QUOTA, TypeHint::ByteQuantity),
    FieldPolicy::scalar(INSTANCES, TypeHint::Integer),
    FieldPolicy::nullable(BUILDPACK, TypeHint::Text),
    FieldPolicy::scalar(DOCKER_IMAGE, TypeHint::Text),
    FieldPolicy::scalar(DOCKER_USERNAME, TypeHint::Text),
    FieldPolicy::scalar(PATH, TypeHint::Path),
    FieldPolicy::nullable(COMMAND, TypeHint::Text),
    FieldPolicy::scalar(STACK, TypeHint::Text),
    FieldPolicy::scalar(HEALTH_CHECK_TYPE, TypeHint::Enumerated(HealthCheckType::NAMES))
        .with_alias("health-check-type"),
    FieldPolicy::scalar(HEALTH_CHECK_HTTP_ENDPOINT, TypeHint::Text)
        .with_alias("health-check-http-endpoint"),
    FieldPolicy::scalar(TIMEOUT, TypeHint::Integer),
    FieldPolicy::scalar(NO_ROUTE, TypeHint::Boolean).with_alias("no-route"),
    FieldPolicy::scalar(RANDOM_ROUTE, TypeHint::Boolean).with_alias("random-route"),
    FieldPolicy::list(ROUTES),
    FieldPolicy::list(SERVICES),
    FieldPolicy::map(ENV),
    FieldPolicy::scalar(HOST, TypeHint::Text),
    FieldPolicy::list(HOSTS),
    FieldPolicy::scalar(DOMAIN, TypeHint::Text),
    FieldPolicy::list(DOMAINS),
    FieldPolicy::scalar(NO_HOSTNAME, TypeHint::Boolean).with_alias("no-hostname"),
    FieldPolicy::list_of(APP_PORTS, TypeHint::Port).with_alias("app-ports"),
];

/// Lookup table from field key to [`FieldPolicy`].
#[derive(Clone, Debug)]
pub struct PolicyTable {
    policies: Vec<FieldPolicy>,
}

impl PolicyTable {
    /// The table for every field a manifest may declare.
    pub fn standard() -> Self {
        Self {
            policies: STANDARD.to_vec(),
        }
    }

    /// A custom table. Later entries replace earlier ones with the same key.
    pub fn new(policies: impl IntoIterator<Item = FieldPolicy>) -> Self {
        let mut table = Self {
            policies: Vec::new(),
        };
        for policy in policies {
            table.insert(policy);
        }
        table
    }

    pub fn insert(&mut self, policy: FieldPolicy) {
        match self.policies.iter_mut().find(|p| p.key == policy.key) {
            Some(existing) => *existing = policy,
            None => self.policies.push(policy),
        }
    }

    /// Look up a field by its key or alias.
    pub fn get(&self, key: &str) -> Option<&FieldPolicy> {
        self.policies.iter().find(|p| p.matches(key))
    }

    /// Policies in table order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldPolicy> {
        self.policies.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.policies.iter().map(|p| p.key)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_kinds() {
        let table = PolicyTable::standard();
        assert_eq!(table.get(MEMORY).unwrap().kind, MergeKind::Override);
        assert_eq!(table.get(ROUTES).unwrap().kind, MergeKind::Append);
        assert_eq!(table.get(SERVICES).unwrap().kind, MergeKind::Append);
        assert_eq!(table.get(ENV).unwrap().kind, MergeKind::KeyMerge);
        assert!(table.get("memroy").is_none());
        assert_eq!(table.len(), table.keys().count());
    }

    #[test]
    fn only_buildpack_and_command_are_nullable() {
        let table = PolicyTable::standard();
        let nullable: Vec<_> = STANDARD
            .iter()
            .filter(|p| p.nullable)
            .map(|p| p.key)
            .collect();
        assert_eq!(nullable, vec![BUILDPACK, COMMAND]);
        assert!(!table.get(STACK).unwrap().nullable);
    }

    #[test]
    fn aliases_resolve_to_canonical_policy() {
        let table = PolicyTable::standard();
        for (alias, key) in [
            ("no-route", NO_ROUTE),
            ("random-route", RANDOM_ROUTE),
            ("health-check-type", HEALTH_CHECK_TYPE),
            ("health-check-http-endpoint", HEALTH_CHECK_HTTP_ENDPOINT),
            ("no-hostname", NO_HOSTNAME),
            ("app-ports", APP_PORTS),
        ] {
            assert_eq!(table.get(alias).unwrap().key, key);
        }
        assert!(table.get("disk-quota").is_none());
    }

    #[test]
    fn route_host_fields_are_known() {
        let table = PolicyTable::standard();
        assert_eq!(table.get(HOST).unwrap().kind, MergeKind::Override);
        assert_eq!(table.get(HOSTS).unwrap().kind, MergeKind::Append);
        assert_eq!(table.get(DOMAIN).unwrap().kind, MergeKind::Override);
        assert_eq!(table.get(DOMAINS).unwrap().kind, MergeKind::Append);
        let ports = table.get(APP_PORTS).unwrap();
        assert_eq!((ports.kind, ports.hint), (MergeKind::Append, TypeHint::Port));
    }

    #[test]
    fn custom_table_replaces_duplicate_keys() {
        let table = PolicyTable::new([
            FieldPolicy::scalar("color", TypeHint::Text),
            FieldPolicy::list("color"),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("color").unwrap().kind, MergeKind::Append);
    }

    // -----------------------------------------------------------------------
    // Type hints
    // -----------------------------------------------------------------------

    #[test]
    fn integer_hint_accepts_decimal_text() {
        assert!(TypeHint::Integer.check(&ScalarValue::Int(3)).is_ok());
        assert!(TypeHint::Integer.check(&"3".into()).is_ok());
        assert!(TypeHint::Integer.check(&"three".into()).is_err());
        assert!(TypeHint::Integer.check(&ScalarValue::Float(1.5)).is_err());
    }

    #[test]
    fn port_hint_accepts_tcp_ports_only() {
        assert!(TypeHint::Port.check(&ScalarValue::Int(8080)).is_ok());
        assert!(TypeHint::Port.check(&"443".into()).is_ok());
        assert!(TypeHint::Port.check(&ScalarValue::Int(0)).is_err());
        assert!(TypeHint::Port.check(&"65536".into()).is_err());
        assert!(TypeHint::Port.check(&"http".into()).is_err());
    }

    #[test]
    fn byte_quantity_hint_requires_unit() {
        assert!(TypeHint::ByteQuantity.check(&"512M".into()).is_ok());
        assert!(TypeHint::ByteQuantity.check(&"1G".into()).is_ok());
        assert!(TypeHint::ByteQuantity.check(&ScalarValue::Int(512)).is_err());
        assert!(TypeHint::ByteQuantity.check(&ScalarValue::Bool(true)).is_err());
    }

    #[test]
    fn boolean_hint_accepts_text_spelling() {
        assert!(TypeHint::Boolean.check(&ScalarValue::Bool(false)).is_ok());
        assert!(TypeHint::Boolean.check(&"true".into()).is_ok());
        assert!(TypeHint::Boolean.check(&"yes".into()).is_err());
    }

    #[test]
    fn enumerated_hint_lists_allowed_values() {
        let hint = TypeHint::Enumerated(HealthCheckType::NAMES);
        assert!(hint.check(&"http".into()).is_ok());
        let reason = hint.check(&"tcp".into()).unwrap_err();
        assert!(reason.contains("port, process, http, none"));
    }

    #[test]
    fn text_hint_rejects_numbers() {
        assert!(TypeHint::Text.check(&"cflinuxfs4".into()).is_ok());
        assert!(TypeHint::Text.check(&ScalarValue::Int(4)).is_err());
    }
}

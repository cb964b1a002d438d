use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use heir_chain::InheritanceChain;
use heir_types::{
    resolve_relative, ByteQuantity, HealthCheckType, ManifestDocument, PropertySet,
    ResolvedApplication, ScalarValue,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{MergeError, MergeResult};
use crate::merged::{MergedProperties, Origin};
use crate::policy::{self, MergeKind, PolicyTable};

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

/// Which part of a manifest a segment came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    Application,
}

/// One property set in the merge sequence, with its declaring document.
#[derive(Clone, Copy, Debug)]
pub struct Segment<'a> {
    pub document: &'a ManifestDocument,
    pub scope: Scope,
    pub properties: &'a PropertySet,
}

/// The merge sequence for `application`, lowest precedence first.
///
/// All global segments root to leaf, then every block named `application`
/// root to leaf (several blocks in one document keep their declared order).
pub fn segments<'a>(chain: &'a InheritanceChain, application: &str) -> Vec<Segment<'a>> {
    let globals = chain.iter().map(|document| Segment {
        document,
        scope: Scope::Global,
        properties: document.global(),
    });
    let blocks = chain.iter().flat_map(move |document| {
        document
            .applications()
            .iter()
            .filter(move |block| block.name == application)
            .map(move |block| Segment {
                document,
                scope: Scope::Application,
                properties: &block.properties,
            })
    });
    globals.chain(blocks).collect()
}

/// Every application name declared anywhere in the chain.
///
/// Leaf names come first, in declared order, followed by names that only
/// ancestors declare. A chain that names no application yields a single
/// empty name, so its globals still resolve (and the validator can reject
/// the missing name).
pub fn application_names(chain: &InheritanceChain) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for document in chain.iter().rev() {
        for block in document.applications() {
            if seen.insert(block.name.as_str()) {
                names.push(block.name.clone());
            }
        }
    }
    if names.is_empty() {
        names.push(String::new());
    }
    names
}

// ---------------------------------------------------------------------------
// MergeEngine
// ---------------------------------------------------------------------------

/// Resolves applications from an inheritance chain.
///
/// The engine holds only its policy table, so one instance can be shared
/// across threads resolving different chains or applications.
#[derive(Clone, Debug, Default)]
pub struct MergeEngine {
    table: PolicyTable,
}

impl MergeEngine {
    /// An engine using the standard field table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: PolicyTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    /// Fold the merge sequence for `application` without projecting it.
    pub fn merge(&self, chain: &InheritanceChain, application: &str) -> MergeResult<MergedProperties> {
        let mut merged = MergedProperties::new();
        for segment in segments(chain, application) {
            debug!(
                application,
                document = %segment.document.location().display(),
                scope = ?segment.scope,
                fields = segment.properties.len(),
                "applying segment"
            );
            merged.apply(&self.table, application, &segment)?;
        }
        Ok(merged)
    }

    /// Resolve one application.
    ///
    /// A name that no block declares still resolves, from globals alone.
    pub fn resolve(&self, chain: &InheritanceChain, application: &str) -> MergeResult<ResolvedApplication> {
        let merged = self.merge(chain, application)?;
        let resolved = self.project(application, &merged)?;
        info!(
            application,
            documents = chain.len(),
            routes = resolved.routes().len(),
            env = resolved.env().len(),
            "resolved application"
        );
        Ok(resolved)
    }

    /// Resolve every application the chain names.
    ///
    /// Failures are per application; one bad application does not stop the
    /// others from resolving.
    pub fn resolve_all(&self, chain: &InheritanceChain) -> Vec<(String, MergeResult<ResolvedApplication>)> {
        application_names(chain)
            .into_iter()
            .map(|name| {
                let result = self.resolve(chain, &name);
                (name, result)
            })
            .collect()
    }

    fn project(&self, application: &str, merged: &MergedProperties) -> MergeResult<ResolvedApplication> {
        self.check_values(application, merged)?;
        let p = Projection { application, merged };

        let instances = p.count(policy::INSTANCES)?;
        let timeout = p.count(policy::TIMEOUT)?;

        Ok(ResolvedApplication::builder(application)
            .memory(p.quantity(policy::MEMORY)?)
            .disk_quota(p.quantity(policy::DISK_QUOTA)?)
            .instances(instances)
            .buildpack(p.defaultable_text(policy::BUILDPACK))
            .docker_image(p.text(policy::DOCKER_IMAGE).filter(|s| !s.is_empty()))
            .docker_username(p.text(policy::DOCKER_USERNAME))
            .path(p.path(policy::PATH))
            .command(p.defaultable_text(policy::COMMAND))
            .stack(p.text(policy::STACK))
            .health_check_type(p.health_check_type(policy::HEALTH_CHECK_TYPE)?)
            .health_check_http_endpoint(p.text(policy::HEALTH_CHECK_HTTP_ENDPOINT))
            .health_check_timeout(timeout)
            .no_route(p.boolean(policy::NO_ROUTE)?)
            .random_route(p.boolean(policy::RANDOM_ROUTE)?)
            .routes(p.list(policy::ROUTES))
            .services(p.list(policy::SERVICES))
            .hosts(p.unique_with(policy::HOSTS, policy::HOST))
            .domains(p.unique_with(policy::DOMAINS, policy::DOMAIN))
            .no_hostname(p.boolean(policy::NO_HOSTNAME)?)
            .app_ports(p.ports(policy::APP_PORTS)?)
            .env(p.env(policy::ENV)?)
            .build())
    }

    /// Check every winning scalar and every list item against its policy.
    fn check_values(&self, application: &str, merged: &MergedProperties) -> MergeResult<()> {
        for policy in self.table.iter() {
            match policy.kind {
                MergeKind::Override => {
                    let Some((value, origin)) = merged.scalar(policy.key) else {
                        continue;
                    };
                    let outcome = if value.is_null() {
                        if policy.nullable {
                            Ok(())
                        } else {
                            Err("null is not allowed".to_string())
                        }
                    } else {
                        policy.hint.check(value)
                    };
                    outcome.map_err(|reason| invalid(application, policy.key, origin, reason))?;
                }
                MergeKind::Append => {
                    for (item, origin) in merged.list(policy.key) {
                        policy
                            .hint
                            .check(&ScalarValue::from(item))
                            .map_err(|reason| invalid(application, policy.key, origin, reason))?;
                    }
                }
                MergeKind::KeyMerge => {}
            }
        }
        Ok(())
    }
}

fn invalid(application: &str, field: &str, origin: &Origin, reason: impl Into<String>) -> MergeError {
    MergeError::InvalidFieldValue {
        application: application.to_string(),
        field: field.to_string(),
        document: origin.document.clone(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Typed reads of already-checked winning values.
struct Projection<'a> {
    application: &'a str,
    merged: &'a MergedProperties,
}

impl Projection<'_> {
    fn present(&self, key: &str) -> Option<(&ScalarValue, &Origin)> {
        self.merged.scalar(key).filter(|(v, _)| !v.is_null())
    }

    fn text(&self, key: &str) -> Option<String> {
        self.present(key)
            .and_then(|(v, _)| v.as_text())
            .map(str::to_string)
    }

    /// Text where `null`, `""` and `"default"` all mean the platform default.
    fn defaultable_text(&self, key: &str) -> Option<String> {
        self.text(key)
            .filter(|s| !s.is_empty() && s != "default")
    }

    fn quantity(&self, key: &str) -> MergeResult<Option<ByteQuantity>> {
        self.present(key)
            .map(|(v, origin)| {
                policy::byte_quantity_value(v)
                    .map_err(|reason| invalid(self.application, key, origin, reason))
            })
            .transpose()
    }

    fn count(&self, key: &str) -> MergeResult<Option<u32>> {
        self.present(key)
            .map(|(v, origin)| {
                let n = policy::integer_value(v)
                    .map_err(|reason| invalid(self.application, key, origin, reason))?;
                u32::try_from(n).map_err(|_| {
                    invalid(
                        self.application,
                        key,
                        origin,
                        format!("{n} is out of range"),
                    )
                })
            })
            .transpose()
    }

    fn boolean(&self, key: &str) -> MergeResult<Option<bool>> {
        self.present(key)
            .map(|(v, origin)| {
                policy::boolean_value(v)
                    .map_err(|reason| invalid(self.application, key, origin, reason))
            })
            .transpose()
    }

    fn health_check_type(&self, key: &str) -> MergeResult<Option<HealthCheckType>> {
        self.present(key)
            .map(|(v, origin)| {
                policy::text_value(v)
                    .and_then(|s| s.parse::<HealthCheckType>().map_err(|e| e.to_string()))
                    .map_err(|reason| invalid(self.application, key, origin, reason))
            })
            .transpose()
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.merged.list(key).map(|(v, _)| v.to_string()).collect()
    }

    /// The list for `list_key` followed by the winning `scalar_key` value,
    /// keeping the first occurrence of each entry.
    fn unique_with(&self, list_key: &str, scalar_key: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.list(list_key)
            .into_iter()
            .chain(self.text(scalar_key))
            .filter(|entry| seen.insert(entry.clone()))
            .collect()
    }

    fn ports(&self, key: &str) -> MergeResult<Vec<u16>> {
        self.merged
            .list(key)
            .map(|(item, origin)| {
                policy::port_value(&ScalarValue::from(item))
                    .map_err(|reason| invalid(self.application, key, origin, reason))
            })
            .collect()
    }

    /// Paths are relative to the manifest that declared them.
    fn path(&self, key: &str) -> Option<PathBuf> {
        self.present(key).and_then(|(v, origin)| {
            v.as_text()
                .map(|s| resolve_relative(&origin.document, s.as_ref()))
        })
    }

    fn env(&self, key: &str) -> MergeResult<BTreeMap<String, String>> {
        self.merged
            .map(key)
            .map(|(name, value, origin)| {
                value
                    .canonical_text()
                    .map(|text| (name.to_string(), text))
                    .map_err(|e| MergeError::InvalidEnvironmentValue {
                        application: self.application.to_string(),
                        variable: name.to_string(),
                        document: origin.document.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}

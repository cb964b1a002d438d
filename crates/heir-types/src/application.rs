use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::quantity::ByteQuantity;

// ---------------------------------------------------------------------------
// HealthCheckType
// ---------------------------------------------------------------------------

/// How the platform decides an application instance is healthy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthCheckType {
    /// TCP connect to the application port (platform default).
    Port,
    /// Process liveness only.
    Process,
    /// HTTP GET against a configured endpoint.
    Http,
    /// Legacy spelling of process-only checking.
    None,
}

impl HealthCheckType {
    /// The type the platform applies when a manifest does not set one.
    pub const PLATFORM_DEFAULT: Self = Self::Port;

    /// Manifest spellings, in declaration order.
    pub const NAMES: &'static [&'static str] = &["port", "process", "http", "none"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Port => "port",
            Self::Process => "process",
            Self::Http => "http",
            Self::None => "none",
        }
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http)
    }
}

impl FromStr for HealthCheckType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "port" => Ok(Self::Port),
            "process" => Ok(Self::Process),
            "http" => Ok(Self::Http),
            "none" => Ok(Self::None),
            other => Err(TypeError::InvalidHealthCheckType(other.to_string())),
        }
    }
}

impl fmt::Display for HealthCheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ResolvedApplication
// ---------------------------------------------------------------------------

/// The flattened configuration for one application.
///
/// A resolved application is immutable: it is built once by the merge
/// engine through [`ResolvedApplicationBuilder`] and only read afterwards.
/// Deriving a variant goes through [`ResolvedApplication::into_builder`],
/// which consumes the original.
///
/// `None` on an optional field means the field was never set (or was reset
/// to the platform default), so the platform decides. Collections are never
/// absent; they are empty instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedApplication {
    name: String,
    memory: Option<ByteQuantity>,
    disk_quota: Option<ByteQuantity>,
    instances: Option<u32>,
    buildpack: Option<String>,
    docker_image: Option<String>,
    docker_username: Option<String>,
    path: Option<PathBuf>,
    command: Option<String>,
    stack: Option<String>,
    health_check_type: Option<HealthCheckType>,
    health_check_http_endpoint: Option<String>,
    health_check_timeout: Option<u32>,
    no_route: Option<bool>,
    random_route: Option<bool>,
    routes: Vec<String>,
    services: Vec<String>,
    hosts: Vec<String>,
    domains: Vec<String>,
    no_hostname: Option<bool>,
    app_ports: Vec<u16>,
    env: BTreeMap<String, String>,
}

impl ResolvedApplication {
    /// Start building a resolved application.
    pub fn builder(name: impl Into<String>) -> ResolvedApplicationBuilder {
        ResolvedApplicationBuilder::new(name)
    }

    /// Consume this application and return a builder seeded with its values.
    pub fn into_builder(self) -> ResolvedApplicationBuilder {
        ResolvedApplicationBuilder { app: self }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn memory(&self) -> Option<ByteQuantity> {
        self.memory
    }

    pub fn disk_quota(&self) -> Option<ByteQuantity> {
        self.disk_quota
    }

    pub fn instances(&self) -> Option<u32> {
        self.instances
    }

    pub fn buildpack(&self) -> Option<&str> {
        self.buildpack.as_deref()
    }

    pub fn docker_image(&self) -> Option<&str> {
        self.docker_image.as_deref()
    }

    pub fn docker_username(&self) -> Option<&str> {
        self.docker_username.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// The explicitly configured health check type, if any.
    pub fn health_check_type(&self) -> Option<HealthCheckType> {
        self.health_check_type
    }

    /// The health check type the platform will actually use.
    pub fn effective_health_check_type(&self) -> HealthCheckType {
        self.health_check_type
            .unwrap_or(HealthCheckType::PLATFORM_DEFAULT)
    }

    pub fn health_check_http_endpoint(&self) -> Option<&str> {
        self.health_check_http_endpoint.as_deref()
    }

    pub fn health_check_timeout(&self) -> Option<u32> {
        self.health_check_timeout
    }

    pub fn no_route(&self) -> Option<bool> {
        self.no_route
    }

    pub fn random_route(&self) -> Option<bool> {
        self.random_route
    }

    /// Routes in merge order, duplicates preserved.
    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    /// Service instances to bind, in merge order.
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Host names, `hosts` entries before `host`, without duplicates.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Domains, `domains` entries before `domain`, without duplicates.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn no_hostname(&self) -> Option<bool> {
        self.no_hostname
    }

    /// Ports the application listens on, in merge order.
    pub fn app_ports(&self) -> &[u16] {
        &self.app_ports
    }

    /// Environment variables with canonical text values.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

// ---------------------------------------------------------------------------
// ResolvedApplicationBuilder
// ---------------------------------------------------------------------------

/// Builder for [`ResolvedApplication`].
#[derive(Clone, Debug)]
pub struct ResolvedApplicationBuilder {
    app: ResolvedApplication,
}

impl ResolvedApplicationBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            app: ResolvedApplication {
                name: name.into(),
                memory: None,
                disk_quota: None,
                instances: None,
                buildpack: None,
                docker_image: None,
                docker_username: None,
                path: None,
                command: None,
                stack: None,
                health_check_type: None,
                health_check_http_endpoint: None,
                health_check_timeout: None,
                no_route: None,
                random_route: None,
                routes: Vec::new(),
                services: Vec::new(),
                hosts: Vec::new(),
                domains: Vec::new(),
                no_hostname: None,
                app_ports: Vec::new(),
                env: BTreeMap::new(),
            },
        }
    }

    pub fn memory(mut self, value: Option<ByteQuantity>) -> Self {
        self.app.memory = value;
        self
    }

    pub fn disk_quota(mut self, value: Option<ByteQuantity>) -> Self {
        self.app.disk_quota = value;
        self
    }

    pub fn instances(mut self, value: Option<u32>) -> Self {
        self.app.instances = value;
        self
    }

    pub fn buildpack(mut self, value: Option<String>) -> Self {
        self.app.buildpack = value;
        self
    }

    pub fn docker_image(mut self, value: Option<String>) -> Self {
        self.app.docker_image = value;
        self
    }

    pub fn docker_username(mut self, value: Option<String>) -> Self {
        self.app.docker_username = value;
        self
    }

    pub fn path(mut self, value: Option<PathBuf>) -> Self {
        self.app.path = value;
        self
    }

    pub fn command(mut self, value: Option<String>) -> Self {
        self.app.command = value;
        self
    }

    pub fn stack(mut self, value: Option<String>) -> Self {
        self.app.stack = value;
        self
    }

    pub fn health_check_type(mut self, value: Option<HealthCheckType>) -> Self {
        self.app.health_check_type = value;
        self
    }

    pub fn health_check_http_endpoint(mut self, value: Option<String>) -> Self {
        self.app.health_check_http_endpoint = value;
        self
    }

    pub fn health_check_timeout(mut self, value: Option<u32>) -> Self {
        self.app.health_check_timeout = value;
        self
    }

    pub fn no_route(mut self, value: Option<bool>) -> Self {
        self.app.no_route = value;
        self
    }

    pub fn random_route(mut self, value: Option<bool>) -> Self {
        self.app.random_route = value;
        self
    }

    pub fn routes(mut self, routes: Vec<String>) -> Self {
        self.app.routes = routes;
        self
    }

    pub fn services(mut self, services: Vec<String>) -> Self {
        self.app.services = services;
        self
    }

    pub fn hosts(mut self, hosts: Vec<String>) -> Self {
        self.app.hosts = hosts;
        self
    }

    pub fn domains(mut self, domains: Vec<String>) -> Self {
        self.app.domains = domains;
        self
    }

    pub fn no_hostname(mut self, value: Option<bool>) -> Self {
        self.app.no_hostname = value;
        self
    }

    pub fn app_ports(mut self, ports: Vec<u16>) -> Self {
        self.app.app_ports = ports;
        self
    }

    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.app.env = env;
        self
    }

    pub fn build(self) -> ResolvedApplication {
        self.app
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_type_round_trips_names() {
        for name in HealthCheckType::NAMES {
            let parsed: HealthCheckType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), *name);
        }
        assert!("tcp".parse::<HealthCheckType>().is_err());
        assert!("HTTP".parse::<HealthCheckType>().is_err());
    }

    #[test]
    fn empty_builder_has_empty_collections() {
        let app = ResolvedApplication::builder("web").build();
        assert_eq!(app.name(), "web");
        assert!(app.routes().is_empty());
        assert!(app.services().is_empty());
        assert!(app.hosts().is_empty());
        assert!(app.domains().is_empty());
        assert!(app.app_ports().is_empty());
        assert!(app.env().is_empty());
        assert!(app.health_check_type().is_none());
        assert_eq!(app.effective_health_check_type(), HealthCheckType::Port);
    }

    #[test]
    fn into_builder_preserves_values() {
        let app = ResolvedApplication::builder("web")
            .memory(Some(ByteQuantity::from_megabytes(256)))
            .routes(vec!["a.example.com".into()])
            .health_check_type(Some(HealthCheckType::Http))
            .health_check_http_endpoint(Some("/health".into()))
            .build();

        let variant = app
            .clone()
            .into_builder()
            .health_check_http_endpoint(None)
            .build();

        assert_eq!(variant.memory(), app.memory());
        assert_eq!(variant.routes(), app.routes());
        assert_eq!(variant.health_check_http_endpoint(), None);
        assert_eq!(app.health_check_http_endpoint(), Some("/health"));
    }

    #[test]
    fn serializes_health_check_type_lowercase() {
        let app = ResolvedApplication::builder("web")
            .health_check_type(Some(HealthCheckType::Process))
            .build();
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["health_check_type"], "process");
        assert_eq!(json["routes"], serde_json::json!([]));
    }
}

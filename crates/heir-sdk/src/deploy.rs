//! The deployer seam.
//!
//! Deploy failures come from the target platform and are reported apart
//! from resolution failures.

use std::collections::HashSet;
use std::sync::RwLock;

use heir_types::ResolvedApplication;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::resolver::Resolution;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    #[error("platform rejected application '{application}': {reason}")]
    Rejected { application: String, reason: String },

    #[error("platform unavailable: {0}")]
    Unavailable(String),
}

/// Creates or updates an application on a target platform.
pub trait Deployer: Send + Sync {
    fn deploy(&self, application: &ResolvedApplication) -> Result<(), DeployError>;
}

impl<D: Deployer + ?Sized> Deployer for &D {
    fn deploy(&self, application: &ResolvedApplication) -> Result<(), DeployError> {
        (**self).deploy(application)
    }
}

impl<D: Deployer + ?Sized> Deployer for Box<D> {
    fn deploy(&self, application: &ResolvedApplication) -> Result<(), DeployError> {
        (**self).deploy(application)
    }
}

// ---------------------------------------------------------------------------
// RecordingDeployer
// ---------------------------------------------------------------------------

/// In-memory deployer that records every application it receives.
#[derive(Default)]
pub struct RecordingDeployer {
    deployed: RwLock<Vec<ResolvedApplication>>,
    rejecting: HashSet<String>,
}

impl RecordingDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject deployments of the named application.
    pub fn rejecting(mut self, name: impl Into<String>) -> Self {
        self.rejecting.insert(name.into());
        self
    }

    /// Applications deployed so far, in order.
    pub fn deployed(&self) -> Vec<ResolvedApplication> {
        self.deployed.read().expect("lock poisoned").clone()
    }
}

impl Deployer for RecordingDeployer {
    fn deploy(&self, application: &ResolvedApplication) -> Result<(), DeployError> {
        if self.rejecting.contains(application.name()) {
            return Err(DeployError::Rejected {
                application: application.name().to_string(),
                reason: "rejected by configuration".into(),
            });
        }
        self.deployed
            .write()
            .expect("lock poisoned")
            .push(application.clone());
        Ok(())
    }
}

impl std::fmt::Debug for RecordingDeployer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingDeployer")
            .field("deployed", &self.deployed.read().map(|d| d.len()).unwrap_or(0))
            .field("rejecting", &self.rejecting)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// deploy_resolution
// ---------------------------------------------------------------------------

/// What happened to each application of a [`Resolution`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DeploySummary {
    pub deployed: Vec<String>,
    /// Applications not deployed because they failed to resolve.
    pub skipped: Vec<String>,
    /// Applications the deployer refused, with the reason.
    pub failed: Vec<(String, String)>,
}

impl DeploySummary {
    pub fn is_success(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Hand every successfully resolved application to `deployer`.
pub fn deploy_resolution(resolution: &Resolution, deployer: &dyn Deployer) -> DeploySummary {
    let mut summary = DeploySummary::default();
    for outcome in &resolution.outcomes {
        let app = match &outcome.result {
            Ok(app) => app,
            Err(e) => {
                warn!(application = %outcome.name, error = %e, "skipping unresolved application");
                summary.skipped.push(outcome.name.clone());
                continue;
            }
        };
        match deployer.deploy(app) {
            Ok(()) => {
                info!(application = app.name(), "deployed");
                summary.deployed.push(app.name().to_string());
            }
            Err(e) => {
                warn!(application = app.name(), error = %e, "deploy failed");
                summary.failed.push((app.name().to_string(), e.to_string()));
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use heir_loader::InMemoryManifestLoader;

    use super::*;
    use crate::resolver::Resolver;

    fn resolution() -> Resolution {
        let loader = InMemoryManifestLoader::new();
        loader
            .insert_yaml(
                "/m/manifest.yml",
                "\
applications:
- name: web
  memory: 256M
- name: worker
  no_route: true
- name: broken
  instances: many
",
            )
            .unwrap();
        Resolver::new(loader).resolve_all("/m/manifest.yml").unwrap()
    }

    #[test]
    fn deploys_resolved_and_skips_failed() {
        let deployer = RecordingDeployer::new();
        let summary = deploy_resolution(&resolution(), &deployer);

        assert_eq!(summary.deployed, ["web", "worker"]);
        assert_eq!(summary.skipped, ["broken"]);
        assert!(summary.failed.is_empty());
        assert!(!summary.is_success());

        let deployed = deployer.deployed();
        assert_eq!(deployed.len(), 2);
        assert_eq!(deployed[1].no_route(), Some(true));
    }

    #[test]
    fn deploy_failures_are_reported_separately() {
        let deployer = RecordingDeployer::new().rejecting("worker");
        let summary = deploy_resolution(&resolution(), &deployer);

        assert_eq!(summary.deployed, ["web"]);
        assert_eq!(summary.skipped, ["broken"]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "worker");
        assert!(summary.failed[0].1.contains("rejected"));
    }

    #[test]
    fn boxed_deployer_delegates() {
        let boxed: Box<dyn Deployer> = Box::new(RecordingDeployer::new());
        let app = ResolvedApplication::builder("web").build();
        assert!(boxed.deploy(&app).is_ok());
    }
}

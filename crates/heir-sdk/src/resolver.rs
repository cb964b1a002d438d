use std::path::{Path, PathBuf};

use heir_chain::{ChainBuilder, InheritanceChain};
use heir_loader::ManifestLoader;
use heir_merge::MergeEngine;
use heir_types::ResolvedApplication;
use heir_validate::Validator;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::error::{ResolveError, SdkResult};

// ---------------------------------------------------------------------------
// AppOutcome / Resolution
// ---------------------------------------------------------------------------

/// The result of resolving one application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppOutcome {
    pub name: String,
    pub result: Result<ResolvedApplication, ResolveError>,
    /// Notes from validation stages that amended the application.
    pub amendments: Vec<String>,
}

impl AppOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every application resolved from one leaf manifest.
#[derive(Clone, Debug)]
pub struct Resolution {
    /// Manifest locations, root first.
    pub chain: Vec<PathBuf>,
    /// One outcome per application, in [`heir_merge::application_names`] order.
    pub outcomes: Vec<AppOutcome>,
}

impl Resolution {
    /// `true` when every application resolved and validated.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(AppOutcome::is_ok)
    }

    pub fn applications(&self) -> impl Iterator<Item = &ResolvedApplication> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ResolveError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    pub fn get(&self, name: &str) -> Option<&AppOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

/// Serialized form used by JSON output.
#[derive(Serialize)]
struct OutcomeView<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    application: Option<&'a ResolvedApplication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    amendments: &'a [String],
}

impl Serialize for AppOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeView {
            name: &self.name,
            application: self.result.as_ref().ok(),
            error: self.result.as_ref().err().map(ToString::to_string),
            amendments: &self.amendments,
        }
        .serialize(serializer)
    }
}

impl Serialize for Resolution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Resolution", 2)?;
        s.serialize_field("chain", &self.chain)?;
        s.serialize_field("applications", &self.outcomes)?;
        s.end()
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Load -> chain -> merge -> validate, over any [`ManifestLoader`].
pub struct Resolver<L> {
    loader: L,
    builder: ChainBuilder,
    engine: MergeEngine,
    validator: Validator,
}

impl<L: ManifestLoader> Resolver<L> {
    /// A resolver with default configuration and the standard validator.
    pub fn new(loader: L) -> Self {
        Self::with_config(loader, &ResolverConfig::default())
    }

    pub fn with_config(loader: L, config: &ResolverConfig) -> Self {
        Self {
            loader,
            builder: ChainBuilder::with_max_depth(config.max_chain_depth),
            engine: MergeEngine::new(),
            validator: Validator::with_default_stages(),
        }
    }

    /// Replace the validation pipeline.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Build the inheritance chain for a leaf manifest.
    pub fn chain(&self, leaf: impl AsRef<Path>) -> SdkResult<InheritanceChain> {
        let chain = self.builder.load(leaf.as_ref(), &self.loader)?;
        debug!(leaf = %leaf.as_ref().display(), documents = chain.len(), "built chain");
        Ok(chain)
    }

    /// Resolve and validate a single application.
    pub fn resolve_app(&self, leaf: impl AsRef<Path>, name: &str) -> SdkResult<ResolvedApplication> {
        let chain = self.chain(leaf)?;
        let outcome = self.resolve_in_chain(&chain, name);
        Ok(outcome.result?)
    }

    /// Resolve every application named anywhere in the chain.
    ///
    /// Chain failures abort the whole resolution. Merge and validation
    /// failures are recorded per application.
    pub fn resolve_all(&self, leaf: impl AsRef<Path>) -> SdkResult<Resolution> {
        let chain = self.chain(leaf)?;
        let outcomes: Vec<_> = heir_merge::application_names(&chain)
            .iter()
            .map(|name| self.resolve_in_chain(&chain, name))
            .collect();

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        info!(
            applications = outcomes.len(),
            failed,
            "resolution complete"
        );
        Ok(Resolution {
            chain: chain.paths(),
            outcomes,
        })
    }

    /// Merge and validate one application against an existing chain.
    pub fn resolve_in_chain(&self, chain: &InheritanceChain, name: &str) -> AppOutcome {
        let merged = match self.engine.resolve(chain, name) {
            Ok(app) => app,
            Err(e) => {
                warn!(application = name, error = %e, "merge failed");
                return AppOutcome {
                    name: name.to_string(),
                    result: Err(e.into()),
                    amendments: Vec::new(),
                };
            }
        };

        let report = self.validator.validate_with_report(merged);
        let amendments = report.amendments().map(str::to_string).collect();
        AppOutcome {
            name: name.to_string(),
            result: report.into_result().map_err(ResolveError::from),
            amendments,
        }
    }
}

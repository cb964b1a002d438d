//! High-level SDK for heir.
//!
//! [`Resolver`] runs the whole pipeline for a leaf manifest: load it, build
//! the inheritance chain, merge every application and validate the
//! results. The [`Deployer`] trait is the seam towards a target platform.
//!
//! ```rust
//! use heir_loader::InMemoryManifestLoader;
//! use heir_sdk::Resolver;
//!
//! let loader = InMemoryManifestLoader::new();
//! loader
//!     .insert_yaml("/apps/base.yml", "memory: 256M\n")
//!     .unwrap();
//! loader
//!     .insert_yaml("/apps/web.yml", "inherit: base.yml\napplications:\n- name: web\n")
//!     .unwrap();
//!
//! let resolver = Resolver::new(loader);
//! let web = resolver.resolve_app("/apps/web.yml", "web").unwrap();
//! assert_eq!(web.memory().map(|m| m.megabytes()), Some(256));
//! ```

pub mod config;
pub mod deploy;
pub mod error;
pub mod resolver;

pub use config::ResolverConfig;
pub use deploy::{deploy_resolution, DeployError, DeploySummary, Deployer, RecordingDeployer};
pub use error::{ResolveError, SdkError, SdkResult};
pub use resolver::{AppOutcome, Resolution, Resolver};

// Re-export key types
pub use heir_chain::InheritanceChain;
pub use heir_loader::{FsManifestLoader, InMemoryManifestLoader, ManifestLoader};
pub use heir_types::{ByteQuantity, HealthCheckType, ResolvedApplication};

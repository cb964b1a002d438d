//! Validation pipeline for resolved applications.
//!
//! Every [`ResolvedApplication`] produced by the merge engine runs through a
//! pipeline of stages before it is handed to a deployer. Stages run in
//! order and the pipeline is fail-fast. A stage may also *amend* the
//! application, returning a corrected copy that later stages see.
//!
//! The default pipeline is:
//!
//! 1. [`IdentityStage`]: the application must have a name.
//! 2. [`SourceStage`]: a docker image excludes a buildpack and a path.
//! 3. [`HealthCheckStage`]: an HTTP endpoint only applies to `http` checks;
//!    otherwise it is cleared with a warning.
//!
//! # Quick Start
//!
//! ```rust
//! use heir_types::ResolvedApplication;
//! use heir_validate::Validator;
//!
//! let validator = Validator::with_default_stages();
//! let app = ResolvedApplication::builder("web").build();
//! assert!(validator.validate(app).is_ok());
//! ```
//!
//! [`ResolvedApplication`]: heir_types::ResolvedApplication

pub mod error;
pub mod stage;
pub mod stages;
pub mod validator;

pub use error::{ValidateResult, ValidationError};
pub use stage::{StageDecision, StageResult, ValidationStage};
pub use stages::{HealthCheckStage, IdentityStage, SourceStage};
pub use validator::{ValidationReport, Validator};

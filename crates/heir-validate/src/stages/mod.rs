//! Built-in validation stages.

pub mod health_check;
pub mod identity;
pub mod source;

pub use health_check::HealthCheckStage;
pub use identity::IdentityStage;
pub use source::SourceStage;

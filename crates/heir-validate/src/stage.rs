use heir_types::ResolvedApplication;
use serde::Serialize;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// StageDecision
// ---------------------------------------------------------------------------

/// The outcome of a single validation stage.
#[derive(Clone, Debug, PartialEq)]
pub enum StageDecision {
    /// The application is acceptable as-is.
    Pass,
    /// The application is acceptable after a correction. Later stages see
    /// the amended application.
    Amend {
        application: ResolvedApplication,
        note: String,
    },
    /// The application is rejected.
    Fail(ValidationError),
}

impl StageDecision {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// Recorded result of one stage run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageResult {
    pub stage_name: String,
    pub passed: bool,
    /// Whether the stage amended the application.
    pub amended: bool,
    /// Amendment note or failure reason.
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// ValidationStage trait
// ---------------------------------------------------------------------------

/// A single check in the validation pipeline.
///
/// Object-safe and `Send + Sync`, so stages live in a
/// `Vec<Box<dyn ValidationStage>>` and a validator can be shared across
/// threads.
pub trait ValidationStage: Send + Sync {
    /// Short name of this stage (e.g. "identity", "source").
    fn name(&self) -> &str;

    /// Inspect the application and decide.
    fn evaluate(&self, application: &ResolvedApplication) -> StageDecision;
}

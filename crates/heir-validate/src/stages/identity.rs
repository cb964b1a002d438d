use heir_types::ResolvedApplication;

use crate::error::ValidationError;
use crate::stage::{StageDecision, ValidationStage};

/// Rejects applications without a name.
pub struct IdentityStage;

impl ValidationStage for IdentityStage {
    fn name(&self) -> &str {
        "identity"
    }

    fn evaluate(&self, application: &ResolvedApplication) -> StageDecision {
        if application.name().trim().is_empty() {
            return StageDecision::Fail(ValidationError::MissingApplicationName);
        }
        StageDecision::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_application_passes() {
        let app = ResolvedApplication::builder("web").build();
        assert!(IdentityStage.evaluate(&app).is_pass());
    }

    #[test]
    fn empty_or_blank_name_fails() {
        for name in ["", "   "] {
            let app = ResolvedApplication::builder(name).build();
            assert_eq!(
                IdentityStage.evaluate(&app),
                StageDecision::Fail(ValidationError::MissingApplicationName)
            );
        }
    }
}

use heir_types::ResolvedApplication;

use crate::stage::{StageDecision, ValidationStage};

/// Clears an HTTP health check endpoint that would never be used.
///
/// The endpoint only applies when the effective health check type is
/// `http`. With any other type (including the platform default, when no
/// type is set) the endpoint is dropped and the stage amends.
pub struct HealthCheckStage;

impl ValidationStage for HealthCheckStage {
    fn name(&self) -> &str {
        "health_check"
    }

    fn evaluate(&self, application: &ResolvedApplication) -> StageDecision {
        let effective = application.effective_health_check_type();
        let Some(endpoint) = application.health_check_http_endpoint() else {
            return StageDecision::Pass;
        };
        if effective.is_http() {
            return StageDecision::Pass;
        }

        let note = format!(
            "health_check_http_endpoint '{endpoint}' ignored for health check type '{effective}'"
        );
        StageDecision::Amend {
            application: application
                .clone()
                .into_builder()
                .health_check_http_endpoint(None)
                .build(),
            note,
        }
    }
}

#[cfg(test)]
mod tests {
    use heir_types::HealthCheckType;

    use super::*;

    fn with_endpoint(kind: Option<HealthCheckType>) -> ResolvedApplication {
        ResolvedApplication::builder("web")
            .health_check_type(kind)
            .health_check_http_endpoint(Some("/health".into()))
            .build()
    }

    #[test]
    fn http_type_keeps_endpoint() {
        let app = with_endpoint(Some(HealthCheckType::Http));
        assert!(HealthCheckStage.evaluate(&app).is_pass());
    }

    #[test]
    fn port_type_clears_endpoint() {
        let app = with_endpoint(Some(HealthCheckType::Port));
        match HealthCheckStage.evaluate(&app) {
            StageDecision::Amend { application, note } => {
                assert_eq!(application.health_check_http_endpoint(), None);
                assert_eq!(application.health_check_type(), Some(HealthCheckType::Port));
                assert!(note.contains("/health"));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn default_type_clears_endpoint() {
        let app = with_endpoint(None);
        assert!(matches!(
            HealthCheckStage.evaluate(&app),
            StageDecision::Amend { .. }
        ));
    }

    #[test]
    fn no_endpoint_passes() {
        let app = ResolvedApplication::builder("web")
            .health_check_type(Some(HealthCheckType::Process))
            .build();
        assert!(HealthCheckStage.evaluate(&app).is_pass());
    }
}

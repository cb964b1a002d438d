use std::fmt;

use heir_types::ResolvedApplication;
use tracing::{debug, warn};

use crate::error::{ValidateResult, ValidationError};
use crate::stage::{StageDecision, StageResult, ValidationStage};
use crate::stages::{HealthCheckStage, IdentityStage, SourceStage};

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// The outcome of running one application through the pipeline.
#[derive(Clone, Debug)]
pub struct ValidationReport {
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
    /// The (possibly amended) application, or the rejecting error.
    pub outcome: ValidateResult<ResolvedApplication>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Notes left by amending stages, in order.
    pub fn amendments(&self) -> impl Iterator<Item = &str> {
        self.stage_results
            .iter()
            .filter(|r| r.amended)
            .filter_map(|r| r.note.as_deref())
    }

    pub fn into_result(self) -> ValidateResult<ResolvedApplication> {
        self.outcome
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// A pipeline of [`ValidationStage`]s.
pub struct Validator {
    stages: Vec<Box<dyn ValidationStage>>,
}

impl Validator {
    /// An empty pipeline. Every application passes.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The standard pipeline: identity -> source -> health_check.
    pub fn with_default_stages() -> Self {
        let mut validator = Self::new();
        validator.add_stage(Box::new(IdentityStage));
        validator.add_stage(Box::new(SourceStage));
        validator.add_stage(Box::new(HealthCheckStage));
        validator
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn ValidationStage>) {
        self.stages.push(stage);
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Validate an application, returning the amended application or the
    /// first failure.
    pub fn validate(&self, application: ResolvedApplication) -> ValidateResult<ResolvedApplication> {
        self.validate_with_report(application).into_result()
    }

    /// Validate an application and keep every stage result.
    ///
    /// Fail-fast: the first failing stage stops the pipeline.
    pub fn validate_with_report(&self, application: ResolvedApplication) -> ValidationReport {
        let mut current = application;
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let decision = stage.evaluate(&current);
            debug!(
                application = current.name(),
                stage = stage.name(),
                pass = decision.is_pass(),
                "validation stage evaluated"
            );

            match decision {
                StageDecision::Pass => stage_results.push(StageResult {
                    stage_name: stage.name().to_string(),
                    passed: true,
                    amended: false,
                    note: None,
                }),
                StageDecision::Amend { application, note } => {
                    warn!(application = application.name(), stage = stage.name(), "{note}");
                    stage_results.push(StageResult {
                        stage_name: stage.name().to_string(),
                        passed: true,
                        amended: true,
                        note: Some(note),
                    });
                    current = application;
                }
                StageDecision::Fail(error) => {
                    stage_results.push(StageResult {
                        stage_name: stage.name().to_string(),
                        passed: false,
                        amended: false,
                        note: Some(error.to_string()),
                    });
                    return ValidationReport {
                        stage_results,
                        outcome: Err(error),
                    };
                }
            }
        }

        ValidationReport {
            stage_results,
            outcome: Ok(current),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::with_default_stages()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.stages.iter().map(|s| s.name()).collect();
        f.debug_struct("Validator").field("stages", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use heir_types::HealthCheckType;

    use super::*;

    // -----------------------------------------------------------------------
    // Default pipeline
    // -----------------------------------------------------------------------

    #[test]
    fn valid_application_passes_every_stage() {
        let app = ResolvedApplication::builder("web")
            .buildpack(Some("go_buildpack".into()))
            .health_check_type(Some(HealthCheckType::Http))
            .health_check_http_endpoint(Some("/health".into()))
            .build();

        let report = Validator::with_default_stages().validate_with_report(app.clone());
        assert!(report.is_valid());
        assert_eq!(report.stage_results.len(), 3);
        assert!(report.stage_results.iter().all(|r| r.passed && !r.amended));
        assert_eq!(report.into_result().unwrap(), app);
    }

    #[test]
    fn missing_name_fails_fast() {
        let app = ResolvedApplication::builder("")
            .docker_image(Some("nginx".into()))
            .buildpack(Some("go_buildpack".into()))
            .build();

        let report = Validator::with_default_stages().validate_with_report(app);
        assert_eq!(report.stage_results.len(), 1);
        assert_eq!(report.stage_results[0].stage_name, "identity");
        assert_eq!(
            report.into_result().unwrap_err(),
            ValidationError::MissingApplicationName
        );
    }

    #[test]
    fn source_conflict_is_reported() {
        let app = ResolvedApplication::builder("web")
            .docker_image(Some("nginx".into()))
            .path(Some("/srv/web".into()))
            .build();

        let err = Validator::with_default_stages().validate(app).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ConflictingSourceConfiguration { ref application, .. } if application == "web"
        ));
    }

    #[test]
    fn unused_endpoint_is_cleared_and_noted() {
        let app = ResolvedApplication::builder("web")
            .health_check_type(Some(HealthCheckType::Process))
            .health_check_http_endpoint(Some("/ping".into()))
            .memory(Some(heir_types::ByteQuantity::from_megabytes(256)))
            .build();

        let report = Validator::with_default_stages().validate_with_report(app);
        let notes: Vec<_> = report.amendments().map(str::to_string).collect();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("/ping"));

        let validated = report.into_result().unwrap();
        assert_eq!(validated.health_check_http_endpoint(), None);
        assert_eq!(validated.memory().map(|m| m.megabytes()), Some(256));
    }

    // -----------------------------------------------------------------------
    // Custom pipelines
    // -----------------------------------------------------------------------

    struct RequireMemory;

    impl ValidationStage for RequireMemory {
        fn name(&self) -> &str {
            "require_memory"
        }

        fn evaluate(&self, application: &ResolvedApplication) -> StageDecision {
            match application.memory() {
                Some(_) => StageDecision::Pass,
                None => StageDecision::Fail(ValidationError::rejected(
                    application.name(),
                    self.name(),
                    "memory must be set",
                )),
            }
        }
    }

    #[test]
    fn empty_pipeline_accepts_anything() {
        let validator = Validator::new();
        assert_eq!(validator.stage_count(), 0);
        assert!(validator
            .validate(ResolvedApplication::builder("").build())
            .is_ok());
    }

    #[test]
    fn custom_stage_runs_after_defaults() {
        let mut validator = Validator::with_default_stages();
        validator.add_stage(Box::new(RequireMemory));
        assert_eq!(validator.stage_count(), 4);

        let report = validator.validate_with_report(ResolvedApplication::builder("web").build());
        assert_eq!(report.stage_results.len(), 4);
        let last = report.stage_results.last().unwrap();
        assert!(!last.passed);
        assert!(last.note.as_deref().unwrap().contains("memory must be set"));
    }

    #[test]
    fn amended_application_reaches_later_stages() {
        struct RequireNoEndpoint;
        impl ValidationStage for RequireNoEndpoint {
            fn name(&self) -> &str {
                "require_no_endpoint"
            }
            fn evaluate(&self, application: &ResolvedApplication) -> StageDecision {
                if application.health_check_http_endpoint().is_some() {
                    StageDecision::Fail(ValidationError::rejected(application.name(), self.name(), "endpoint"))
                } else {
                    StageDecision::Pass
                }
            }
        }

        let mut validator = Validator::with_default_stages();
        validator.add_stage(Box::new(RequireNoEndpoint));
        let app = ResolvedApplication::builder("web")
            .health_check_http_endpoint(Some("/health".into()))
            .build();
        assert!(validator.validate(app).is_ok());
    }

    #[test]
    fn debug_lists_stage_names() {
        let rendered = format!("{:?}", Validator::with_default_stages());
        assert!(rendered.contains("identity"));
        assert!(rendered.contains("health_check"));
    }

    #[test]
    fn stage_results_serialize() {
        let report = Validator::with_default_stages()
            .validate_with_report(ResolvedApplication::builder("web").build());
        let json = serde_json::to_value(&report.stage_results).unwrap();
        assert_eq!(json[0]["stage_name"], "identity");
    }
}

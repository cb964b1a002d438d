use heir_types::ResolvedApplication;

use crate::error::ValidationError;
use crate::stage::{StageDecision, ValidationStage};

/// An application is either built from source or run from a docker image,
/// never both.
///
/// Fails when `docker.image` is set together with a buildpack or a path.
pub struct SourceStage;

impl ValidationStage for SourceStage {
    fn name(&self) -> &str {
        "source"
    }

    fn evaluate(&self, application: &ResolvedApplication) -> StageDecision {
        let Some(image) = application.docker_image() else {
            return StageDecision::Pass;
        };

        let conflict = if let Some(buildpack) = application.buildpack() {
            Some(format!(
                "docker image '{image}' cannot be combined with buildpack '{buildpack}'"
            ))
        } else {
            application.path().map(|path| {
                format!(
                    "docker image '{image}' cannot be combined with path '{}'",
                    path.display()
                )
            })
        };

        match conflict {
            Some(reason) => StageDecision::Fail(ValidationError::ConflictingSourceConfiguration {
                application: application.name().to_string(),
                reason,
            }),
            None => StageDecision::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docker_app() -> heir_types::ResolvedApplicationBuilder {
        ResolvedApplication::builder("web").docker_image(Some("nginx:1.27".into()))
    }

    #[test]
    fn docker_image_alone_passes() {
        assert!(SourceStage.evaluate(&docker_app().build()).is_pass());
    }

    #[test]
    fn buildpack_and_path_without_docker_pass() {
        let app = ResolvedApplication::builder("web")
            .buildpack(Some("go_buildpack".into()))
            .path(Some("/srv/web".into()))
            .build();
        assert!(SourceStage.evaluate(&app).is_pass());
    }

    #[test]
    fn docker_with_buildpack_fails() {
        let app = docker_app().buildpack(Some("go_buildpack".into())).build();
        match SourceStage.evaluate(&app) {
            StageDecision::Fail(ValidationError::ConflictingSourceConfiguration {
                application,
                reason,
            }) => {
                assert_eq!(application, "web");
                assert!(reason.contains("go_buildpack"));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn docker_with_path_fails() {
        let app = docker_app().path(Some("/srv/web".into())).build();
        assert!(SourceStage.evaluate(&app).is_fail());
    }
}

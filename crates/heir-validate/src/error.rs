/// Errors that reject a resolved application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The application has no name.
    #[error("application name is missing")]
    MissingApplicationName,

    /// Mutually exclusive source settings are both present.
    #[error("application '{application}': conflicting source configuration: {reason}")]
    ConflictingSourceConfiguration { application: String, reason: String },

    /// A custom stage rejected the application.
    #[error("application '{application}' rejected by stage '{stage}': {message}")]
    Rejected {
        application: String,
        stage: String,
        message: String,
    },
}

impl ValidationError {
    /// Create a rejection from a custom stage.
    pub fn rejected(
        application: impl Into<String>,
        stage: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Rejected {
            application: application.into(),
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias for validation results.
pub type ValidateResult<T> = Result<T, ValidationError>;

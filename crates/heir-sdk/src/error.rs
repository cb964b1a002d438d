use thiserror::Error;

/// Why one application failed to resolve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Merge(#[from] heir_merge::MergeError),

    #[error(transparent)]
    Validation(#[from] heir_validate::ValidationError),
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("chain error: {0}")]
    Chain(#[from] heir_chain::ChainError),

    #[error("merge error: {0}")]
    Merge(#[from] heir_merge::MergeError),

    #[error("validation error: {0}")]
    Validation(#[from] heir_validate::ValidationError),
}

impl From<ResolveError> for SdkError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Merge(e) => Self::Merge(e),
            ResolveError::Validation(e) => Self::Validation(e),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

use thiserror::Error;

use models::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn internal(e: impl std::fmt::Display) -> Self { Self::Internal(e.to_string()) }
}

/// Failure of the outbound user existence check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("user service unreachable: {0}")]
    Unavailable(String),
    #[error("user service answered with unexpected status {0}")]
    UnexpectedStatus(u16),
}

use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReportError {
    #[error("Report not found: {0}")]
    NotFound(String),
    #[error("Report validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ReportError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound { id, .. } => ReportError::NotFound(id),
            FrameworkError::Rejected(msg) => ReportError::ValidationError(msg),
            other => ReportError::ActorCommunicationError(other.to_string()),
        }
    }
}

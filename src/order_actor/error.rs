use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::UnavailableProduct;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Product {0} not found")]
    ProductNotFound(String),
    #[error("No products available for order")]
    NothingAvailable(Vec<UnavailableProduct>),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Order already submitted: {0}")]
    DuplicateSubmission(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound { id, .. } => OrderError::NotFound(id),
            FrameworkError::Conflict { key, .. } => OrderError::DuplicateSubmission(key),
            FrameworkError::Rejected(msg) => OrderError::ValidationError(msg),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::domain::UnavailableProduct;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::report_actor::ReportError;
use crate::user_actor::UserError;

/// Every failure a handler can return. Rendered as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("No products available for order")]
    NothingAvailable(Vec<UnavailableProduct>),
    #[error("No token provided")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Admin access required")]
    AdminRequired,
    #[error("Access denied")]
    AccessDenied,
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::NothingAvailable(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken | ApiError::InvalidToken | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::AdminRequired | ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::NothingAvailable(unavailable) => json!({
                "message": self.to_string(),
                "unavailableProducts": unavailable,
            }),
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Request failed");
                json!({ "message": self.to_string() })
            }
            _ => json!({ "message": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => ApiError::NotFound("Product not found".to_string()),
            ProductError::ValidationError(msg) => ApiError::BadRequest(msg),
            ProductError::InsufficientStock { .. } | ProductError::InvalidQuantity(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ProductError::ActorCommunicationError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => ApiError::NotFound("Order not found".to_string()),
            OrderError::ProductNotFound(id) => ApiError::NotFound(format!("Product {id} not found")),
            OrderError::NothingAvailable(unavailable) => ApiError::NothingAvailable(unavailable),
            OrderError::ValidationError(msg) => ApiError::BadRequest(msg),
            OrderError::DuplicateSubmission(_) => ApiError::BadRequest("Order already submitted".to_string()),
            OrderError::ActorCommunicationError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            UserError::AlreadyExists(_) => ApiError::BadRequest("User already exists".to_string()),
            UserError::ValidationError(msg) => ApiError::BadRequest(msg),
            UserError::ActorCommunicationError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotFound(_) => ApiError::NotFound("Report not found".to_string()),
            ReportError::ValidationError(msg) => ApiError::BadRequest(msg),
            ReportError::ActorCommunicationError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => ApiError::InvalidToken,
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::UserExists => ApiError::BadRequest("User already exists".to_string()),
            AuthError::ValidationError(msg) => ApiError::BadRequest(msg),
            AuthError::TokenEncoding(msg) | AuthError::Hashing(msg) => ApiError::Internal(msg),
            AuthError::User(e) => e.into(),
        }
    }
}

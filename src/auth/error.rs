use thiserror::Error;

use crate::user_actor::UserError;

/// Errors raised while issuing tokens or checking credentials.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User already exists")]
    UserExists,
    #[error("{0}")]
    ValidationError(String),
    #[error("Token encoding failed: {0}")]
    TokenEncoding(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    User(#[from] UserError),
}

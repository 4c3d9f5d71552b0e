//! Request extractors. The caller's identity is resolved here, once per
//! request, and handed to handlers as a plain value.

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::{ApiError, AppState};
use crate::domain::Identity;

const IDEMPOTENCY_HEADER: &str = "idempotency-key";
const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

/// JSON body whose rejections render as `{"message": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections render as `{"message": ...}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `None` when no token was sent. A header without a token counts as absent.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| ApiError::InvalidToken)?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    Ok((!token.is_empty()).then_some(token))
}

/// A caller with a valid bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(ApiError::MissingToken)?;
        Ok(Self(state.auth.verify_token(token)?))
    }
}

/// An authenticated caller whose role is admin.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl FromRequestParts<Arc<AppState>> for AdminIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Authenticated(identity) = Authenticated::from_request_parts(parts, state).await?;
        if !identity.is_admin() {
            return Err(ApiError::AdminRequired);
        }
        Ok(Self(identity))
    }
}

/// Guests are allowed, but a token that is sent must be valid.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl FromRequestParts<Arc<AppState>> for MaybeIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(Self(Some(state.auth.verify_token(token)?))),
            None => Ok(Self(None)),
        }
    }
}

/// Optional `Idempotency-Key` header.
#[derive(Debug, Clone)]
pub struct IdempotencyKey(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for IdempotencyKey {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(IDEMPOTENCY_HEADER) else {
            return Ok(Self(None));
        };
        let key = value
            .to_str()
            .map_err(|_| ApiError::BadRequest("Invalid Idempotency-Key header".to_string()))?
            .trim();
        if key.is_empty() {
            return Ok(Self(None));
        }
        if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
            return Err(ApiError::BadRequest("Idempotency-Key is too long".to_string()));
        }
        Ok(Self(Some(key.to_string())))
    }
}

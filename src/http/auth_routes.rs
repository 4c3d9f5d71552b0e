use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tracing::instrument;

use super::extract::{ApiJson, Authenticated};
use super::{ApiError, AppState};
use crate::auth::{AuthSession, LoginRequest, SignupRequest};
use crate::domain::{User, UserPatch};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
}

#[instrument(skip_all, fields(user_email = %request.email))]
async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthSession>), ApiError> {
    let session = state.auth.signup(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[instrument(skip_all, fields(user_email = %request.email))]
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    Ok(Json(state.auth.login(request).await?))
}

#[instrument(skip_all, fields(user_id = identity.id))]
async fn me(State(state): State<Arc<AppState>>, Authenticated(identity): Authenticated) -> Result<Json<User>, ApiError> {
    Ok(Json(state.auth.current_user(&identity).await?))
}

#[instrument(skip_all, fields(user_id = identity.id))]
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Authenticated(identity): Authenticated,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.auth.update_profile(&identity, patch).await?))
}

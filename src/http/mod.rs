//! JSON REST surface. Handlers resolve the caller, call the store clients and
//! serialize the result; no business rule lives here.

mod admin_routes;
mod auth_routes;
mod error;
mod extract;
mod inventory_routes;
mod order_routes;
mod state;


use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;
pub use state::AppState;

const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/api/health", get(health))
        .nest("/api/auth", auth_routes::routes())
        .nest("/api/inventory", inventory_routes::routes())
        .nest("/api/orders", order_routes::routes())
        .nest("/api/admin", admin_routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn banner() -> &'static str {
    "Inventory Management System API"
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stores = state.stores.health(HEALTH_PROBE_TIMEOUT).await;
    let (status, label) = if stores.all_up() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (status, Json(json!({ "status": label, "stores": stores })))
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

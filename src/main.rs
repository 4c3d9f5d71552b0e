mod actor_framework;
mod analytics;
mod app_system;
mod auth;
mod clients;
mod domain;
mod http;
mod order_actor;
mod product_actor;
mod report_actor;
mod user_actor;

#[cfg(test)]
mod mock_framework;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::app_system::{setup_tracing, Config, StoreSystem, SystemError};
use crate::auth::{Argon2Hasher, AuthService, TokenIssuer};
use crate::http::{build_router, shutdown_signal, AppState};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::load()?;
    info!(addr = %config.bind_addr(), "Starting storefront");

    let system = StoreSystem::start(config.actor_buffer);
    let ttl = config
        .token_ttl()
        .ok_or_else(|| SystemError::Startup(format!("Token lifetime out of range: {}h", config.token_ttl_hours)))?;
    let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), ttl);
    let auth = AuthService::new(system.stores.users.clone(), Argon2Hasher::default(), tokens);

    if let Some(admin) = &config.admin {
        auth.seed_admin(&admin.name, &admin.email, &admin.password)
            .await
            .map_err(|e| SystemError::Startup(format!("Admin seed failed: {e}")))?;
    }

    let state = Arc::new(AppState::new(system.stores.clone(), auth, config.invoice_tax_rate));
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "Server running");

    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;
    if let Err(e) = &served {
        error!(error = %e, "Server stopped with an error");
    }

    // Shutdown system gracefully
    system.shutdown().await?;
    served?;

    info!("Application completed successfully");
    Ok(())
}

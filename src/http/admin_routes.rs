use std::sync::Arc;

use axum::extract::State;
use axum::routing::{delete, get, patch, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::extract::{AdminIdentity, ApiJson, ApiPath};
use super::inventory_routes::delete_product;
use super::{ApiError, AppState};
use crate::analytics::{self, AnalyticsDashboard, DashboardStats};
use crate::domain::{MissingProductReport, Order, OrderStatusUpdate, Product, ReportStatusUpdate, User};

const RECENT_ORDERS: usize = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products/{id}", delete(delete_product))
        .route("/products/{id}/stock", patch(set_stock))
        .route("/orders", get(all_orders))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/missing-products", get(missing_products))
        .route("/missing-products/{id}", patch(update_report))
        .route("/analytics/dashboard", get(analytics_dashboard))
        .route("/dashboard-stats", get(dashboard_stats))
        .route("/recent-orders", get(recent_orders))
        .route("/low-stock", get(low_stock))
        .route("/users", get(users))
        .route("/users/{id}", delete(delete_user))
}

#[derive(Debug, Deserialize)]
struct StockUpdate {
    stock: u32,
}

#[instrument(skip_all, fields(admin_id = admin.id, product_id = id, stock = update.stock))]
async fn set_stock(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
    ApiPath(id): ApiPath<u64>,
    ApiJson(update): ApiJson<StockUpdate>,
) -> Result<Json<Value>, ApiError> {
    let product = state.stores.products.set_stock(id, update.stock).await?;
    Ok(Json(json!({ "message": "Stock updated", "product": product })))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
async fn all_orders(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.stores.orders.list_all().await?))
}

#[instrument(skip_all, fields(admin_id = admin.id, order_id = id, status = %update.status))]
async fn update_order_status(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
    ApiPath(id): ApiPath<u64>,
    ApiJson(update): ApiJson<OrderStatusUpdate>,
) -> Result<Json<Value>, ApiError> {
    let order = state.stores.orders.update_status(id, update.status).await?;
    Ok(Json(json!({ "message": "Order status updated successfully", "order": order })))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
async fn missing_products(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<Json<Vec<MissingProductReport>>, ApiError> {
    Ok(Json(state.stores.reports.list_pending().await?))
}

#[instrument(skip_all, fields(admin_id = admin.id, report_id = id))]
async fn update_report(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
    ApiPath(id): ApiPath<u64>,
    ApiJson(update): ApiJson<ReportStatusUpdate>,
) -> Result<Json<Value>, ApiError> {
    let report = state.stores.reports.update_status(id, update.status).await?;
    Ok(Json(json!({ "message": "Report updated", "report": report })))
}

/// Orders and products are read as two separate snapshots.
async fn snapshot(state: &AppState) -> Result<(Vec<Order>, Vec<Product>), ApiError> {
    let (orders, products) = tokio::join!(
        state.stores.orders.list_all(),
        state.stores.products.list_products(Default::default()),
    );
    Ok((orders?, products?))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
async fn analytics_dashboard(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<Json<AnalyticsDashboard>, ApiError> {
    let (orders, products) = snapshot(&state).await?;
    Ok(Json(analytics::dashboard(&orders, &products, Utc::now())))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<Json<DashboardStats>, ApiError> {
    let (orders, products) = snapshot(&state).await?;
    let total_users = state.stores.users.count_users().await?;
    Ok(Json(analytics::dashboard_stats(&orders, &products, total_users)))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
async fn recent_orders(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.stores.orders.recent(RECENT_ORDERS).await?))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
async fn low_stock(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.stores.products.list_low_stock().await?))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
async fn users(State(state): State<Arc<AppState>>, AdminIdentity(admin): AdminIdentity) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.stores.users.list_users().await?))
}

#[instrument(skip_all, fields(admin_id = admin.id, user_id = id))]
async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Value>, ApiError> {
    state.stores.users.delete_user(id).await?;
    info!("User removed by admin");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

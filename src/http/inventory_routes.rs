use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::instrument;

use super::extract::{AdminIdentity, ApiJson, ApiPath};
use super::{ApiError, AppState};
use crate::domain::{Product, ProductCreate, ProductFilter, ProductPatch};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/categories/list", get(list_categories))
        .route("/{id}", get(get_product).put(update_product).delete(delete_product))
}

#[instrument(skip(state))]
async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.stores.products.list_products(filter).await?))
}

#[instrument(skip(state))]
async fn get_product(State(state): State<Arc<AppState>>, ApiPath(id): ApiPath<u64>) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.stores.products.require_product(id).await?))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.stores.products.list_categories().await?))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
async fn create_product(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
    ApiJson(params): ApiJson<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.stores.products.create_product(params).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip_all, fields(admin_id = admin.id, product_id = id))]
async fn update_product(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
    ApiPath(id): ApiPath<u64>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.stores.products.update_product(id, patch).await?))
}

#[instrument(skip_all, fields(admin_id = admin.id, product_id = id))]
pub(super) async fn delete_product(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Value>, ApiError> {
    state.stores.products.delete_product(id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{instrument, warn};

use super::extract::{ApiJson, ApiPath, Authenticated, IdempotencyKey, MaybeIdentity};
use super::{ApiError, AppState};
use crate::domain::{Bill, CheckoutRequest, Customer, Identity, Invoice, Order, OrderItem, UnavailableProduct};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(place_order))
        .route("/my-orders", get(my_orders))
        .route("/invoice/{id}", get(invoice))
        .route("/{id}", get(get_order))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub bill: Bill,
    pub unavailable_products: Vec<UnavailableProduct>,
    pub replayed: bool,
}

#[derive(Debug, Serialize)]
pub struct OrderView {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub bill: Bill,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            items: order.items.clone(),
            bill: Bill::from(&order),
            order,
        }
    }
}

/// Accounts order under their own email; guests must say who they are.
async fn resolve_customer(
    state: &AppState,
    identity: Option<&Identity>,
    request: &CheckoutRequest,
) -> Result<Customer, ApiError> {
    let given_name = request
        .customer_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match identity {
        Some(identity) => {
            let user = state.stores.users.require_user(identity.id).await?;
            let name = given_name.map(str::to_string).unwrap_or(user.name);
            Ok(Customer::account(user.id, name, user.email))
        }
        None => {
            let email = request
                .customer_email
                .as_deref()
                .map(str::trim)
                .filter(|email| email.contains('@'));
            match (given_name, email) {
                (Some(name), Some(email)) => Ok(Customer::guest(name, email)),
                _ => Err(ApiError::BadRequest(
                    "Guest orders need customerName and customerEmail".to_string(),
                )),
            }
        }
    }
}

#[instrument(skip_all, fields(user_id = ?identity.as_ref().map(|i| i.id), lines = request.items.len()))]
async fn place_order(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    IdempotencyKey(key): IdempotencyKey,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let customer = resolve_customer(&state, identity.as_ref(), &request).await?;
    let outcome = state.stores.orders.place_order(request.items, customer, key).await?;

    let (status, message) = if outcome.replayed {
        (StatusCode::OK, "Order already placed")
    } else {
        (StatusCode::CREATED, "Order created successfully")
    };
    let response = CheckoutResponse {
        message,
        items: outcome.order.items.clone(),
        bill: Bill::from(&outcome.order),
        order: outcome.order,
        unavailable_products: outcome.unavailable,
        replayed: outcome.replayed,
    };
    Ok((status, Json(response)))
}

#[instrument(skip_all, fields(user_id = identity.id))]
async fn my_orders(
    State(state): State<Arc<AppState>>,
    Authenticated(identity): Authenticated,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.stores.orders.list_for_user(identity.id).await?))
}

async fn visible_order(state: &AppState, id: u64, viewer: Option<&Identity>) -> Result<Order, ApiError> {
    let order = state.stores.orders.require_order(id).await?;
    if !order.visible_to(viewer) {
        warn!(order_id = id, viewer = ?viewer.map(|v| v.id), "Order access denied");
        return Err(ApiError::AccessDenied);
    }
    Ok(order)
}

#[instrument(skip(state, identity))]
async fn get_order(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<OrderView>, ApiError> {
    let order = visible_order(&state, id, identity.as_ref()).await?;
    Ok(Json(OrderView::from(order)))
}

#[instrument(skip(state, identity))]
async fn invoice(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Invoice>, ApiError> {
    let order = visible_order(&state, id, identity.as_ref()).await?;
    Ok(Json(Invoice::for_order(&order, state.invoice_tax_rate)))
}

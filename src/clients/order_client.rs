use std::cmp::Reverse;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use super::{ProductClient, ReportClient, StockReservation};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{
    CartLine, CheckoutOutcome, Customer, Order, OrderCreate, OrderLine, OrderStatus, OrderStatusUpdate, ReportCreate,
    UnavailableProduct,
};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;

/// Client for interacting with the Order actor.
///
/// Checkout is orchestrated here: stock is reserved line by line through the
/// product store, shortfalls are reported, and the order is written only once
/// at least one line could be filled.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    product_client: ProductClient,
    report_client: ReportClient,
    item_ids: Arc<AtomicU64>,
}

impl_client_methods!(OrderClient, Order, OrderError, order);

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, product_client: ProductClient, report_client: ReportClient) -> Self {
        Self {
            inner,
            product_client,
            report_client,
            item_ids: Arc::new(AtomicU64::new(1)),
        }
    }

    #[instrument(skip(self, cart, customer), fields(lines = cart.len(), user_id = ?customer.user_id))]
    pub async fn place_order(
        &self,
        cart: Vec<CartLine>,
        customer: Customer,
        idempotency_key: Option<String>,
    ) -> Result<CheckoutOutcome, OrderError> {
        info!("Processing checkout");

        if cart.is_empty() {
            warn!("Rejected empty cart");
            return Err(OrderError::ValidationError("Cart is empty".to_string()));
        }
        if let Some(line) = cart.iter().find(|line| line.quantity == 0) {
            warn!(product_id = line.product_id, "Rejected zero quantity");
            return Err(OrderError::ValidationError(format!(
                "Invalid quantity for product {}",
                line.product_id
            )));
        }

        let scoped_key = idempotency_key.map(|key| customer.scoped_key(&key));
        if let Some(key) = &scoped_key {
            if let Some(order) = self.find_by_key(key).await? {
                info!(order_id = order.id, "Replaying earlier submission");
                return Ok(replay(order));
            }
        }

        let mut reservation = StockReservation::new(self.product_client.clone());
        let mut lines = Vec::new();
        let mut unavailable = Vec::new();

        for line in &cart {
            match reservation.reserve(line.product_id, line.quantity).await {
                Ok(product) => {
                    let item_id = self.item_ids.fetch_add(1, Ordering::SeqCst);
                    lines.push(OrderLine::snapshot(item_id, &product, line.quantity));
                }
                Err(ProductError::InsufficientStock { name, requested, available }) => {
                    warn!(product_id = line.product_id, requested, available, "Insufficient stock");
                    self.report_shortfall(line.product_id, &name, requested - available, &customer).await;
                    unavailable.push(UnavailableProduct {
                        product_id: line.product_id,
                        product_name: name,
                        requested_quantity: requested,
                        available_stock: available,
                    });
                }
                Err(ProductError::NotFound(_)) => {
                    warn!(product_id = line.product_id, "Unknown product in cart");
                    reservation.rollback().await;
                    return Err(OrderError::ProductNotFound(line.product_id.to_string()));
                }
                Err(e) => {
                    error!(product_id = line.product_id, error = %e, "Stock reservation failed");
                    reservation.rollback().await;
                    return Err(OrderError::ActorCommunicationError(e.to_string()));
                }
            }
        }

        if lines.is_empty() {
            warn!(unavailable = unavailable.len(), "Nothing in the cart could be filled");
            return Err(OrderError::NothingAvailable(unavailable));
        }

        let params = OrderCreate {
            user_id: customer.user_id,
            customer_name: customer.name,
            customer_email: customer.email,
            idempotency_key: scoped_key.clone(),
            lines,
        };

        let id = match self.inner.create(params).await {
            Ok(id) => id,
            Err(FrameworkError::Conflict { key, .. }) => {
                warn!(key = %key, "Lost a duplicate submission race");
                reservation.rollback().await;
                return match self.find_by_key(&key).await? {
                    Some(order) => Ok(replay(order)),
                    None => Err(OrderError::DuplicateSubmission(key)),
                };
            }
            Err(e) => {
                error!(error = %e, "Order write failed");
                reservation.rollback().await;
                return Err(e.into());
            }
        };
        reservation.commit();

        let order = self.require_order(id).await?;
        info!(order_id = id, total = order.total_amount, "Order placed");
        Ok(CheckoutOutcome {
            order,
            unavailable,
            replayed: false,
        })
    }

    /// Report failures are logged and never fail the checkout.
    async fn report_shortfall(&self, product_id: u64, product_name: &str, shortfall: u32, customer: &Customer) {
        let params = ReportCreate {
            product_id,
            product_name: product_name.to_string(),
            requested_quantity: shortfall,
            customer_id: customer.user_id,
            customer_name: customer.name.clone(),
        };
        if let Err(e) = self.report_client.record_shortfall(params).await {
            error!(product_id, error = %e, "Failed to record missing product");
        }
    }

    #[instrument(skip(self))]
    pub async fn find_by_key(&self, key: &str) -> Result<Option<Order>, OrderError> {
        let key = key.to_string();
        let mut found = self
            .inner
            .list(move |order| order.idempotency_key.as_deref() == Some(key.as_str()))
            .await?;
        Ok(found.pop())
    }

    /// The caller's orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: u64) -> Result<Vec<Order>, OrderError> {
        let orders = self.inner.list(move |order| order.user_id == Some(user_id)).await?;
        Ok(newest_first(orders))
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        let orders = self.inner.list(|_| true).await?;
        Ok(newest_first(orders))
    }

    #[instrument(skip(self))]
    pub async fn recent(&self, limit: usize) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list_all().await?;
        orders.truncate(limit);
        Ok(orders)
    }

    /// Changes the status only; stock is never given back.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: u64, status: OrderStatus) -> Result<Order, OrderError> {
        let order = self.inner.update(id, OrderStatusUpdate { status }).await?;
        info!(order_id = id, status = %status, "Order status updated");
        Ok(order)
    }
}

fn replay(order: Order) -> CheckoutOutcome {
    CheckoutOutcome {
        order,
        unavailable: Vec::new(),
        replayed: true,
    }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by_key(|order| (Reverse(order.created_at), Reverse(order.id)));
    orders
}

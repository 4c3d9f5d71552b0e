use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::product::Product;
use super::user::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// A line of a persisted order. Name and price are copied from the product at
/// checkout time and never follow later product edits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: u64,
    pub order_id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
    pub subtotal: f64,
}

/// Represents a customer order together with the items it owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,
    pub user_id: Option<u64>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip)]
    pub idempotency_key: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order line staged during checkout, before the order id exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub item_id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
}

impl OrderLine {
    pub fn snapshot(item_id: u64, product: &Product, quantity: u32) -> Self {
        Self {
            item_id,
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            price: product.price,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: Option<u64>,
    pub customer_name: String,
    pub customer_email: String,
    pub idempotency_key: Option<String>,
    pub lines: Vec<OrderLine>,
}

/// The only mutation an order accepts after creation.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

impl Order {
    /// Owners and admins see their orders; guest orders are public.
    pub fn visible_to(&self, viewer: Option<&Identity>) -> bool {
        match (self.user_id, viewer) {
            (None, _) => true,
            (Some(_), Some(identity)) if identity.is_admin() => true,
            (Some(owner), Some(identity)) => owner == identity.id,
            (Some(_), None) => false,
        }
    }

    #[cfg(test)]
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(|item| item.subtotal).sum()
    }
}

// =============================================================================
// CHECKOUT PAYLOADS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
}

/// Who the order is for, resolved by the caller before checkout starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub user_id: Option<u64>,
    pub name: String,
    pub email: String,
}

impl Customer {
    pub fn guest(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: None,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn account(user_id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Idempotency keys are only unique per customer.
    pub fn scoped_key(&self, key: &str) -> String {
        match self.user_id {
            Some(id) => format!("user:{id}:{key}"),
            None => format!("guest:{}:{key}", self.email.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableProduct {
    pub product_id: u64,
    pub product_name: String,
    pub requested_quantity: u32,
    pub available_stock: u32,
}

#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub unavailable: Vec<UnavailableProduct>,
    /// True when an earlier order with the same idempotency key was returned.
    pub replayed: bool,
}

// =============================================================================
// DERIVED VIEWS
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub order_id: u64,
    pub date: DateTime<Utc>,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
}

impl From<&Order> for Bill {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            date: order.created_at,
            customer_name: order.customer_name.clone(),
            items: order.items.clone(),
            total_amount: order.total_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub product_id: u64,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    pub order_id: u64,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax: f64,
    pub total: f64,
}

impl Invoice {
    pub fn for_order(order: &Order, tax_rate: f64) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| InvoiceLine {
                product_id: item.product_id,
                name: item.product_name.clone(),
                quantity: item.quantity,
                price: item.price,
                total: item.subtotal,
            })
            .collect();
        let subtotal = round_cents(order.total_amount);
        let tax = round_cents(subtotal * tax_rate);
        Self {
            invoice_number: format!("INV-{:06}", order.id),
            order_id: order.id,
            order_date: order.created_at,
            status: order.status,
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            items,
            subtotal,
            tax_rate,
            tax,
            total: round_cents(subtotal + tax),
        }
    }
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn order(user_id: Option<u64>) -> Order {
        let now = Utc::now();
        Order {
            id: 7,
            user_id,
            total_amount: 30.0,
            status: OrderStatus::Completed,
            customer_name: "Dana".into(),
            customer_email: "dana@example.com".into(),
            idempotency_key: None,
            items: vec![OrderItem {
                id: 1,
                order_id: 7,
                product_id: 3,
                product_name: "Mug".into(),
                quantity: 3,
                price: 10.0,
                subtotal: 30.0,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    fn identity(id: u64, role: Role) -> Identity {
        Identity { id, email: format!("u{id}@example.com"), role }
    }

    #[test]
    fn test_guest_orders_are_public() {
        assert!(order(None).visible_to(None));
        assert!(order(None).visible_to(Some(&identity(9, Role::Customer))));
    }

    #[test]
    fn test_owned_orders_need_owner_or_admin() {
        let owned = order(Some(4));
        assert!(!owned.visible_to(None));
        assert!(!owned.visible_to(Some(&identity(5, Role::Customer))));
        assert!(owned.visible_to(Some(&identity(4, Role::Customer))));
        assert!(owned.visible_to(Some(&identity(1, Role::Admin))));
    }

    #[test]
    fn test_invoice_applies_tax_and_numbering() {
        let invoice = Invoice::for_order(&order(None), 0.075);
        assert_eq!(invoice.invoice_number, "INV-000007");
        assert_eq!(invoice.subtotal, 30.0);
        assert_eq!(invoice.tax, 2.25);
        assert_eq!(invoice.total, 32.25);
        assert_eq!(invoice.items[0].name, "Mug");
    }

    #[test]
    fn test_scoped_keys_separate_customers() {
        let alice = Customer::account(1, "Alice", "a@example.com");
        let guest = Customer::guest("Guest", "A@Example.com");
        assert_eq!(alice.scoped_key("k1"), "user:1:k1");
        assert_eq!(guest.scoped_key("k1"), "guest:a@example.com:k1");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let parsed: OrderStatusUpdate = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(parsed.status, OrderStatus::Pending);
    }
}

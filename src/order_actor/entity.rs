use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderItem, OrderStatus, OrderStatusUpdate};

impl Entity for Order {
    type Id = u64;
    type CreateParams = OrderCreate;
    type Patch = OrderStatusUpdate;
    type Action = ();
    type ActionResult = ();

    const KIND: &'static str = "order";

    fn id(&self) -> &u64 {
        &self.id
    }

    /// Creates a new Order from staged checkout lines.
    ///
    /// # Notes
    /// The order is initialized with status `completed` (there is no payment
    /// step) and its total is computed here from the lines, so the total always
    /// equals the sum of the item subtotals.
    fn from_create_params(id: u64, params: OrderCreate) -> Result<Self, String> {
        if params.lines.is_empty() {
            return Err("An order needs at least one item".to_string());
        }
        if let Some(line) = params.lines.iter().find(|line| line.quantity == 0) {
            return Err(format!("Invalid quantity for product {}", line.product_id));
        }

        let items: Vec<OrderItem> = params
            .lines
            .iter()
            .map(|line| OrderItem {
                id: line.item_id,
                order_id: id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                price: line.price,
                subtotal: line.subtotal(),
            })
            .collect();
        let total_amount = items.iter().map(|item| item.subtotal).sum();

        let now = Utc::now();
        Ok(Self {
            id,
            user_id: params.user_id,
            total_amount,
            status: OrderStatus::Completed,
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            idempotency_key: params.idempotency_key,
            items,
            created_at: now,
            updated_at: now,
        })
    }

    fn unique_key(&self) -> Option<String> {
        self.idempotency_key.clone()
    }

    /// Only the status changes; items are immutable.
    fn on_update(&mut self, patch: OrderStatusUpdate) -> Result<(), String> {
        self.status = patch.status;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err("Orders are never deleted".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderLine;

    fn line(item_id: u64, quantity: u32, price: f64) -> OrderLine {
        OrderLine {
            item_id,
            product_id: item_id * 10,
            product_name: format!("Item {item_id}"),
            quantity,
            price,
        }
    }

    fn params(lines: Vec<OrderLine>) -> OrderCreate {
        OrderCreate {
            user_id: None,
            customer_name: "Guest".into(),
            customer_email: "guest@example.com".into(),
            idempotency_key: None,
            lines,
        }
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let order = Order::from_create_params(5, params(vec![line(1, 2, 2.5), line(2, 1, 10.0)])).unwrap();
        assert_eq!(order.total_amount, 15.0);
        assert_eq!(order.total_amount, order.items_total());
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.items.iter().all(|item| item.order_id == 5));
    }

    #[test]
    fn test_empty_or_zero_quantity_orders_are_rejected() {
        assert!(Order::from_create_params(1, params(vec![])).is_err());
        assert!(Order::from_create_params(1, params(vec![line(1, 0, 1.0)])).is_err());
    }
}

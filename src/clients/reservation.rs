use tracing::{error, info, instrument, warn};

use super::ProductClient;
use crate::domain::Product;
use crate::product_actor::ProductError;

/// Stock taken on behalf of one checkout.
///
/// Every successful `reserve` is remembered. The holder must end with exactly
/// one of `commit` (the order was written) or `rollback` (give the units
/// back). Dropping a guard that still holds stock is logged as an error since
/// those units are then lost until an admin corrects the count.
pub struct StockReservation {
    product_client: ProductClient,
    held: Vec<(u64, u32)>,
    settled: bool,
}

impl StockReservation {
    pub fn new(product_client: ProductClient) -> Self {
        Self {
            product_client,
            held: Vec::new(),
            settled: false,
        }
    }

    pub async fn reserve(&mut self, product_id: u64, quantity: u32) -> Result<Product, ProductError> {
        let product = self.product_client.reserve_stock(product_id, quantity).await?;
        self.held.push((product_id, quantity));
        Ok(product)
    }

    #[cfg(test)]
    pub fn held(&self) -> &[(u64, u32)] {
        &self.held
    }

    pub fn commit(mut self) {
        info!(lines = self.held.len(), "Stock reservation committed");
        self.settled = true;
    }

    /// Releases everything taken so far, newest first. Failures are logged and
    /// do not stop the remaining releases.
    #[instrument(skip(self), fields(lines = self.held.len()))]
    pub async fn rollback(mut self) {
        warn!("Rolling back stock reservation");
        while let Some((product_id, quantity)) = self.held.pop() {
            if let Err(e) = self.product_client.release_stock(product_id, quantity).await {
                error!(product_id, quantity, error = %e, "Failed to release reserved stock");
            }
        }
        self.settled = true;
    }
}

impl Drop for StockReservation {
    fn drop(&mut self) {
        if !self.settled && !self.held.is_empty() {
            error!(held = ?self.held, "Stock reservation dropped without commit or rollback");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{sequence, ResourceActor};
    use crate::domain::ProductCreate;

    async fn catalog() -> (ProductClient, u64, u64) {
        let (actor, inner) = ResourceActor::<Product>::new(8, sequence());
        tokio::spawn(actor.run());
        let client = ProductClient::new(inner);
        let mut ids = Vec::new();
        for name in ["Pen", "Ink"] {
            let product = client
                .create_product(ProductCreate {
                    name: name.into(),
                    description: None,
                    category: None,
                    price: 1.0,
                    stock: 5,
                    low_stock_threshold: 1,
                    image_url: None,
                })
                .await
                .unwrap();
            ids.push(product.id);
        }
        (client, ids[0], ids[1])
    }

    #[tokio::test]
    async fn test_rollback_restores_every_line() {
        let (client, pen, ink) = catalog().await;

        let mut reservation = StockReservation::new(client.clone());
        reservation.reserve(pen, 2).await.unwrap();
        reservation.reserve(ink, 5).await.unwrap();
        assert_eq!(reservation.held(), &[(pen, 2), (ink, 5)]);
        assert_eq!(client.require_product(ink).await.unwrap().stock, 0);

        reservation.rollback().await;

        assert_eq!(client.require_product(pen).await.unwrap().stock, 5);
        assert_eq!(client.require_product(ink).await.unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_failed_reserve_is_not_held() {
        let (client, pen, _) = catalog().await;

        let mut reservation = StockReservation::new(client.clone());
        assert!(reservation.reserve(pen, 6).await.is_err());
        assert!(reservation.held().is_empty());

        reservation.reserve(pen, 1).await.unwrap();
        reservation.commit();
        assert_eq!(client.require_product(pen).await.unwrap().stock, 4);
    }
}

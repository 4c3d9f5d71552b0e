use chrono::Utc;

use super::actions::{ProductAction, ProductActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};

impl Entity for Product {
    type Id = u64;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    const KIND: &'static str = "product";

    fn id(&self) -> &u64 {
        &self.id
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects a blank name or a negative/non-finite price.
    fn from_create_params(id: u64, params: ProductCreate) -> Result<Self, String> {
        let now = Utc::now();
        let product = Self {
            id,
            name: params.name.trim().to_string(),
            description: params.description,
            category: params.category,
            price: params.price,
            stock: params.stock,
            low_stock_threshold: params.low_stock_threshold,
            image_url: params.image_url,
            created_at: now,
            updated_at: now,
        };
        product.validate()?;
        Ok(product)
    }

    /// Applies every field present in the patch, then re-validates.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(threshold) = patch.low_stock_threshold {
            self.low_stock_threshold = threshold;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        self.validate()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Handles product-specific actions.
    ///
    /// # Actions
    /// - `ReserveStock(amount)`: decrements stock when enough is on hand
    /// - `ReleaseStock(amount)`: increments stock
    ///
    /// # Errors
    /// Returns an error for zero-unit reservations/releases and for a release
    /// that would overflow the stock counter.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::ReserveStock(0) | ProductAction::ReleaseStock(0) => {
                Err("Invalid quantity: 0".to_string())
            }
            ProductAction::ReserveStock(amount) => {
                if self.stock < amount {
                    return Ok(ProductActionResult::Insufficient {
                        name: self.name.clone(),
                        available: self.stock,
                    });
                }
                self.stock -= amount;
                self.updated_at = Utc::now();
                Ok(ProductActionResult::Reserved(self.clone()))
            }
            ProductAction::ReleaseStock(amount) => {
                self.stock = self
                    .stock
                    .checked_add(amount)
                    .ok_or_else(|| format!("Stock overflow releasing {} units", amount))?;
                self.updated_at = Utc::now();
                Ok(ProductActionResult::Released(self.stock))
            }
        }
    }
}

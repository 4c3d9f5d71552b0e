use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductFilter, ProductPatch};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        let id = self.inner.create(params).await?;
        info!(product_id = id, "Product created");
        self.require_product(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        Ok(self.inner.list(move |product| filter.matches(product)).await?)
    }

    /// Products at or below their own threshold, lowest stock first.
    #[instrument(skip(self))]
    pub async fn list_low_stock(&self) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        let mut products = self.inner.list(Product::is_low_stock).await?;
        products.sort_by_key(|product| product.stock);
        Ok(products)
    }

    /// Distinct non-empty categories, sorted.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<String>, ProductError> {
        let products = self.inner.list(|product| product.category.is_some()).await?;
        let mut categories: Vec<String> = products.into_iter().filter_map(|product| product.category).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: u64, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        let product = self.inner.update(id, patch).await?;
        info!(product_id = id, stock = product.stock, "Product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn set_stock(&self, id: u64, stock: u32) -> Result<Product, ProductError> {
        let patch = ProductPatch {
            stock: Some(stock),
            ..Default::default()
        };
        self.update_product(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: u64) -> Result<(), ProductError> {
        debug!("Sending request");
        self.inner.delete(id).await?;
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Atomically takes `quantity` units and returns the product as priced at
    /// that instant.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: u64, quantity: u32) -> Result<Product, ProductError> {
        if quantity == 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReserveStock(quantity)).await? {
            ProductActionResult::Reserved(product) => Ok(product),
            ProductActionResult::Insufficient { name, available } => Err(ProductError::InsufficientStock {
                name,
                requested: quantity,
                available,
            }),
            other => Err(ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
        }
    }

    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: u64, quantity: u32) -> Result<u32, ProductError> {
        if quantity == 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReleaseStock(quantity)).await? {
            ProductActionResult::Released(level) => Ok(level),
            other => Err(ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
        }
    }
}

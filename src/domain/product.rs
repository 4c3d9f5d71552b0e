use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Threshold applied when a product is created without one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Represents a product in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub stock: u32,
    pub low_stock_threshold: u32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_threshold() -> u32 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub low_stock_threshold: Option<u32>,
    pub image_url: Option<String>,
}

/// Catalog query: case-insensitive name substring plus exact category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl Product {
    #[cfg(test)]
    pub fn new(id: u64, name: impl Into<String>, price: f64, stock: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            description: None,
            category: None,
            price,
            stock,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name is required".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("Invalid price: {}", self.price));
        }
        Ok(())
    }
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };
        let category_ok = match self.category.as_deref() {
            Some(category) if !category.is_empty() && category != "all" => {
                product.category.as_deref() == Some(category)
            }
            _ => true,
        };
        search_ok && category_ok
    }
}

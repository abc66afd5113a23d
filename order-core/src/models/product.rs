//! Product catalog snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product as seen by a composition screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub model: String,
    pub size: String,
    pub default_price: Decimal,
    pub image_ref: Option<String>,
}

/// Immutable snapshot of the product catalog supplied to a composition
/// session. Line items copy their display fields from here at add-time;
/// later catalog edits never reach existing lines.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Resolve a product reference against the snapshot.
    pub fn resolve(&self, product_ref: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id == product_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }
}

//! The catalog product and its filter type.
//!
//! Products are owned by the [`CatalogStore`](crate::store::CatalogStore); the
//! ledger engine only reads and writes `stock_quantity` and reads the price.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product held in the catalog.
///
/// Everything except `stock_quantity` and `price` is descriptive metadata as
/// far as the stock ledger is concerned. The catalog assigns `id` on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Base price. Inventory valuation always uses this, never the promotion.
    pub price: f64,
    /// Promotional price; only effective when lower than the base price.
    pub promotional_price: Option<f64>,
    /// On-hand stock. Reservations are *not* subtracted from this.
    pub stock_quantity: u32,
    pub category: String,
    pub variety: String,
    pub vintage: u16,
    pub region: String,
    pub rating: f64,
    pub reviews: Vec<ProductReview>,
}

impl Product {
    /// Creates a product with empty metadata. Catalog-facing fields can be
    /// filled in afterwards; the engine only needs name, price and stock.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, stock_quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            promotional_price: None,
            stock_quantity,
            category: String::new(),
            variety: String::new(),
            vintage: 0,
            region: String::new(),
            rating: 0.0,
            reviews: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.stock_quantity > 0
    }

    /// True when a promotional price exists and undercuts the base price.
    pub fn is_on_sale(&self) -> bool {
        matches!(self.promotional_price, Some(p) if p < self.price)
    }

    /// Effective sale price: the promotion when on sale, else the base price.
    pub fn sale_price(&self) -> f64 {
        if self.is_on_sale() {
            self.promotional_price.unwrap_or(self.price)
        } else {
            self.price
        }
    }
}

/// A customer review attached to a product. Catalog metadata only; the
/// stock ledger never touches these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReview {
    pub id: u32,
    pub user_id: String,
    pub user_name: String,
    /// 1-5 stars.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub approved: bool,
}

/// Conjunctive filter for [`CatalogStore::list_filtered`](crate::store::CatalogStore::list_filtered).
///
/// `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub variety: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        if let Some(variety) = &self.variety {
            if !product.variety.eq_ignore_ascii_case(variety) {
                return false;
            }
        }
        true
    }
}

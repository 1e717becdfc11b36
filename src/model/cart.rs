//! Shopping cart and line items.
//!
//! Carts live in memory for the lifetime of the process, keyed by cart id in
//! the [`CartService`](crate::cart::CartService) map. A production system
//! would back them with durable per-session storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line in a cart.
///
/// `product_name` and `unit_price` are snapshots taken when the line was
/// added. The price snapshot keeps historical cart totals stable even if the
/// catalog price changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique within the owning cart.
    pub id: u32,
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// A shopper's cart: an ordered sequence of line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of line subtotals.
    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Sum of line quantities.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Next line id: one past the current maximum, starting at 1.
    pub fn next_item_id(&self) -> u32 {
        self.items.iter().map(|item| item.id).max().unwrap_or(0) + 1
    }

    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn item_mut(&mut self, product_id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.product_id == product_id)
    }
}

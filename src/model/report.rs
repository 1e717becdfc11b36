//! Value objects returned by engine operations. None of these are persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// Outcome of a single stock-mutating operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReceipt {
    pub product_id: String,
    /// On-hand quantity after the operation.
    pub on_hand: u32,
    /// Human-readable summary for display or logs.
    pub message: String,
}

/// Outcome of completing (or releasing holds for) an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSettlement {
    pub order_id: String,
    /// Total units deducted (or released).
    pub units_settled: u32,
    /// Number of reservation movements consumed.
    pub movements_settled: usize,
    pub message: String,
}

/// Aggregate inventory snapshot.
///
/// `inventory_value` is computed from the *base* price, never promotions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub total_products: usize,
    pub total_units: u64,
    pub out_of_stock_products: usize,
    /// Products with 1 to 10 units on hand.
    pub low_stock_products: usize,
    pub inventory_value: f64,
    pub generated_at: DateTime<Utc>,
}

/// The catalog partitioned by stock health.
///
/// The three partitions are exhaustive and mutually exclusive: every product
/// lands in exactly one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockStatusReport {
    /// On-hand == 0.
    pub out_of_stock: Vec<Product>,
    /// On-hand in (0, threshold].
    pub low_stock: Vec<Product>,
    /// On-hand > threshold.
    pub healthy_stock: Vec<Product>,
}

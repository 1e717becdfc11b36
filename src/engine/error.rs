//! Error types for the stock ledger engine.

use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// The quantity must be positive for this operation.
    #[error("Quantity must be positive: {0}")]
    InvalidQuantity(u32),

    /// The inventory actor's channel is closed; the system is shut down.
    #[error("Inventory actor closed")]
    ActorClosed,

    /// The inventory actor dropped the response channel.
    #[error("Inventory actor dropped response channel")]
    ActorDropped,
}

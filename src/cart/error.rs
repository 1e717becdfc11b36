//! Error types for cart operations.
//!
//! Cart failures keep their cause: an engine failure inside a cart operation
//! is carried along instead of being collapsed into a bare boolean.

use thiserror::Error;

use crate::engine::InventoryError;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// No cart with the given id exists in the session store.
    #[error("Cart not found: {0}")]
    CartNotFound(String),

    /// The cart has no line for the given product.
    #[error("Item not found in cart: {0}")]
    ItemNotFound(String),

    /// The product is missing or lacks stock for the requested quantity.
    #[error("Product unavailable: {product_id} (requested {requested})")]
    ProductUnavailable { product_id: String, requested: u32 },

    /// The operation requires a non-empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A stock reservation attempted as part of this operation failed.
    #[error("Reservation failed: {0}")]
    ReservationFailed(#[source] InventoryError),

    /// Any other engine failure surfaced through a cart operation.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

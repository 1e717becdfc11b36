//! External collaborator seams: the catalog store and the movement ledger.
//!
//! # Architecture Note
//! The engine never owns its data. It is handed a [`CatalogStore`] and a
//! [`MovementLedger`] as trait objects at wiring time (see
//! [`StockSystem`](crate::lifecycle::StockSystem)), so the host process owns
//! the storage lifecycle and tests can substitute their own implementations.
//! Both contracts assume strong consistency: a read after a write by the same
//! caller observes the write.
//!
//! The in-memory reference implementations live in [`memory`].

pub mod memory;

pub use memory::{InMemoryCatalog, InMemoryLedger};

use crate::model::{Movement, MovementKind, Product, ProductFilter};
use async_trait::async_trait;

/// Product storage, keyed by product id.
///
/// The stock ledger engine only reads products and overwrites stock
/// quantities; catalog CRUD is exposed for the host process.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Point lookup by id.
    async fn get(&self, id: &str) -> Option<Product>;

    /// Every product in the catalog.
    async fn list(&self) -> Vec<Product>;

    /// Products matching the filter; `None` fields match everything.
    async fn list_filtered(&self, filter: &ProductFilter) -> Vec<Product>;

    /// Stores a new product, assigning an id when the given one is empty.
    /// Returns the stored product.
    async fn create(&self, product: Product) -> Product;

    /// Full overwrite by id. Returns the stored product, or `None` when no
    /// product with that id exists.
    async fn update(&self, product: Product) -> Option<Product>;

    /// Overwrites only the stock quantity. Returns the new quantity, or
    /// `None` when the product is missing.
    async fn set_stock(&self, id: &str, quantity: u32) -> Option<u32>;

    /// Removes a product. Returns whether anything was deleted.
    async fn delete(&self, id: &str) -> bool;
}

/// Append-only storage for ledger movements.
#[async_trait]
pub trait MovementLedger: Send + Sync {
    /// Appends a movement, assigning a monotonic id when the given id is 0.
    /// Returns the movement as stored.
    async fn append(&self, movement: Movement) -> Movement;

    /// All movements for a product, in append order.
    async fn by_product(&self, product_id: &str) -> Vec<Movement>;

    /// All movements of one kind, in append order.
    async fn by_kind(&self, kind: MovementKind) -> Vec<Movement>;

    /// All movements whose reason contains `text`, case-insensitively.
    ///
    /// This is the query that locates an order's reservations; see
    /// [`Movement::reservation_marker`].
    async fn by_reason_contains(&self, text: &str) -> Vec<Movement>;
}

//! In-memory reference implementations of the collaborator traits.
//!
//! These back the default [`StockSystem`](crate::lifecycle::StockSystem)
//! wiring and the test suite. Interior mutability via `RwLock` keeps the
//! traits `&self` so the stores can be shared behind `Arc`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::model::{Movement, MovementKind, Product, ProductFilter};
use crate::store::{CatalogStore, MovementLedger};

/// Catalog backed by a `HashMap`. Ids are issued as `product_{n}`.
pub struct InMemoryCatalog {
    products: RwLock<HashMap<String, Product>>,
    next_id: AtomicU64,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn get(&self, id: &str) -> Option<Product> {
        self.products.read().unwrap().get(id).cloned()
    }

    async fn list(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.read().unwrap().values().cloned().collect();
        // HashMap iteration order is arbitrary; keep listings stable.
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products
    }

    async fn list_filtered(&self, filter: &ProductFilter) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .unwrap()
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products
    }

    async fn create(&self, mut product: Product) -> Product {
        if product.id.is_empty() {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            product.id = format!("product_{id}");
        }
        debug!(product_id = %product.id, "Catalog create");
        self.products
            .write()
            .unwrap()
            .insert(product.id.clone(), product.clone());
        product
    }

    async fn update(&self, product: Product) -> Option<Product> {
        let mut products = self.products.write().unwrap();
        if !products.contains_key(&product.id) {
            return None;
        }
        products.insert(product.id.clone(), product.clone());
        Some(product)
    }

    async fn set_stock(&self, id: &str, quantity: u32) -> Option<u32> {
        let mut products = self.products.write().unwrap();
        let product = products.get_mut(id)?;
        product.stock_quantity = quantity;
        Some(quantity)
    }

    async fn delete(&self, id: &str) -> bool {
        self.products.write().unwrap().remove(id).is_some()
    }
}

/// Append-only ledger backed by a `Vec`. Ids are monotonic from 1.
pub struct InMemoryLedger {
    movements: RwLock<Vec<Movement>>,
    next_id: AtomicU64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            movements: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovementLedger for InMemoryLedger {
    async fn append(&self, mut movement: Movement) -> Movement {
        if movement.id == 0 {
            movement.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        }
        debug!(
            movement_id = movement.id,
            product_id = %movement.product_id,
            kind = %movement.kind,
            quantity = movement.quantity,
            "Ledger append"
        );
        self.movements.write().unwrap().push(movement.clone());
        movement
    }

    async fn by_product(&self, product_id: &str) -> Vec<Movement> {
        self.movements
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.product_id == product_id)
            .cloned()
            .collect()
    }

    async fn by_kind(&self, kind: MovementKind) -> Vec<Movement> {
        self.movements
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.kind == kind)
            .cloned()
            .collect()
    }

    async fn by_reason_contains(&self, text: &str) -> Vec<Movement> {
        let needle = text.to_lowercase();
        self.movements
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.reason.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn catalog_assigns_ids_and_overwrites() {
        let catalog = InMemoryCatalog::new();

        let stored = catalog.create(Product::new("", "Vinho Verde", 30.0, 12)).await;
        assert_eq!(stored.id, "product_1");

        let mut updated = stored.clone();
        updated.price = 35.0;
        let result = catalog.update(updated).await.unwrap();
        assert_eq!(result.price, 35.0);
        assert_eq!(catalog.get("product_1").await.unwrap().price, 35.0);

        // Updating a missing product stores nothing.
        assert!(catalog.update(Product::new("product_9", "Ghost", 1.0, 1)).await.is_none());

        assert_eq!(catalog.set_stock("product_1", 7).await, Some(7));
        assert_eq!(catalog.get("product_1").await.unwrap().stock_quantity, 7);

        assert!(catalog.delete("product_1").await);
        assert!(!catalog.delete("product_1").await);
    }

    #[tokio::test]
    async fn ledger_ids_are_monotonic_and_search_is_case_insensitive() {
        let ledger = InMemoryLedger::new();

        let first = ledger
            .append(Movement::new("product_1", 5, MovementKind::Addition, "Restock", "admin"))
            .await;
        let second = ledger
            .append(Movement::new(
                "product_1",
                3,
                MovementKind::Reserved,
                "Reservation for order cart_1",
                "cart_1",
            ))
            .await;
        assert!(second.id > first.id);

        let found = ledger.by_reason_contains("RESERVATION FOR ORDER cart_1").await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, MovementKind::Reserved);

        assert_eq!(ledger.by_product("product_1").await.len(), 2);
        assert_eq!(ledger.by_kind(MovementKind::Addition).await.len(), 1);
    }
}

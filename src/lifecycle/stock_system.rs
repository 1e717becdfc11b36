//! The main runtime orchestrator for the stock ledger system.

use std::sync::Arc;

use tracing::{error, info};

use crate::cart::CartService;
use crate::clients::InventoryClient;
use crate::engine;
use crate::store::{CatalogStore, InMemoryCatalog, InMemoryLedger, MovementLedger};

/// Wires the collaborators, spawns the inventory actor, and hands out the
/// handles a host process needs.
///
/// # Architecture
///
/// - **Inventory actor**: the single writer for all stock operations,
///   reachable through [`StockSystem::inventory`].
/// - **Cart service**: session carts, mediating between shoppers and the
///   inventory client.
/// - **Stores**: the catalog and ledger collaborators. The system keeps
///   shared handles so hosts (and tests) can seed products or inspect the
///   ledger directly.
///
/// # Example
///
/// ```ignore
/// let system = StockSystem::new();
/// let product = system.catalog.create(Product::new("", "Barolo", 90.0, 24)).await;
///
/// let cart = system.carts.get_or_create_cart("alice").await;
/// system.carts.add_item_with_reservation(&cart.id, &product.id, 2, "alice").await?;
/// system.carts.finalize(&cart.id).await?;
///
/// system.shutdown().await?;
/// ```
pub struct StockSystem {
    /// Client for the inventory actor.
    pub inventory: InventoryClient,

    /// Session cart storage and operations.
    pub carts: CartService,

    /// The catalog collaborator, shared with the engine.
    pub catalog: Arc<dyn CatalogStore>,

    /// The ledger collaborator, shared with the engine.
    pub ledger: Arc<dyn MovementLedger>,

    /// Task handle for the running actor (used for graceful shutdown).
    handle: tokio::task::JoinHandle<()>,
}

impl StockSystem {
    /// Creates a system backed by fresh in-memory stores.
    pub fn new() -> Self {
        Self::with_stores(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(InMemoryLedger::new()),
        )
    }

    /// Creates a system over caller-provided stores. This is the seam for
    /// swapping in durable implementations.
    pub fn with_stores(
        catalog: Arc<dyn CatalogStore>,
        ledger: Arc<dyn MovementLedger>,
    ) -> Self {
        let (actor, inventory) = engine::new(catalog.clone(), ledger.clone());
        let handle = tokio::spawn(actor.run());

        let carts = CartService::new(inventory.clone(), catalog.clone());

        Self {
            inventory,
            carts,
            catalog,
            ledger,
            handle,
        }
    }

    /// Gracefully shuts down the system: drops every client (closing the
    /// actor's channel) and waits for the actor task to finish.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down stock system...");

        // Dropping the clients closes the command channel; the actor's
        // receiver returns None and its loop exits. The cart service holds a
        // client clone, so it must go too.
        drop(self.inventory);
        drop(self.carts);

        if let Err(e) = self.handle.await {
            error!("Inventory actor task failed: {:?}", e);
            return Err(format!("Inventory actor task failed: {e:?}"));
        }

        info!("Stock system shutdown complete.");
        Ok(())
    }
}

impl Default for StockSystem {
    fn default() -> Self {
        Self::new()
    }
}

//! The Stock Ledger Engine and its single-writer actor.
//!
//! # Main Components
//!
//! - [`InventoryEngine`] - the reservation / commit / release logic
//! - [`InventoryActor`] / [`InventoryCommand`] - the message loop that
//!   serializes every operation
//! - [`InventoryError`] - the failure taxonomy
//!
//! # Testing
//!
//! See [`mock`] for an expectation-based inventory client that lets the cart
//! layer be tested without spawning the real actor.

pub mod actor;
pub mod core;
pub mod error;
pub mod mock;

pub use actor::{InventoryActor, InventoryCommand, Response};
pub use error::InventoryError;
pub use self::core::{InventoryEngine, DEFAULT_LOW_STOCK_THRESHOLD};

use crate::clients::InventoryClient;
use crate::store::{CatalogStore, MovementLedger};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Creates the inventory actor and its client, wired to the given stores.
/// The caller spawns the actor (`tokio::spawn(actor.run())`).
pub fn new(
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn MovementLedger>,
) -> (InventoryActor, InventoryClient) {
    let (sender, receiver) = mpsc::channel(32);
    let actor = InventoryActor::new(receiver, InventoryEngine::new(catalog, ledger));
    let client = InventoryClient::new(sender);
    (actor, client)
}

//! # The Inventory Actor
//!
//! Single-writer message loop around the [`InventoryEngine`].
//!
//! # Architecture Note
//! Every engine operation is a multi-step read-modify-write against the
//! catalog and the ledger. Run concurrently, two reservations could both
//! pass the availability check before either is recorded. Instead of
//! per-product locks we use the actor model: one task owns the engine and
//! processes [`InventoryCommand`]s *sequentially* from an `mpsc` channel, so
//! no two operations ever interleave. Report queries flow through the same
//! loop and therefore observe a consistent snapshot.
//!
//! Callers never touch the channel directly; they go through
//! [`InventoryClient`](crate::clients::InventoryClient).

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::model::{InventoryReport, Movement, OrderSettlement, Product, StockReceipt, StockStatusReport};

use super::{InventoryEngine, InventoryError};

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, InventoryError>>;

/// Requests processed by the inventory actor, one variant per engine
/// operation (documented on [`super::core`]).
#[derive(Debug)]
pub enum InventoryCommand {
    CheckAvailability {
        product_id: String,
        quantity: u32,
        respond_to: Response<bool>,
    },
    Add {
        product_id: String,
        quantity: u32,
        reason: String,
        user_id: String,
        respond_to: Response<StockReceipt>,
    },
    Remove {
        product_id: String,
        quantity: u32,
        reason: String,
        user_id: String,
        respond_to: Response<StockReceipt>,
    },
    Reserve {
        product_id: String,
        quantity: u32,
        order_id: String,
        respond_to: Response<StockReceipt>,
    },
    Release {
        product_id: String,
        quantity: u32,
        order_id: String,
        respond_to: Response<StockReceipt>,
    },
    CompleteOrder {
        order_id: String,
        respond_to: Response<OrderSettlement>,
    },
    ProcessReturn {
        product_id: String,
        quantity: u32,
        reason: String,
        user_id: String,
        respond_to: Response<StockReceipt>,
    },
    Adjust {
        product_id: String,
        new_quantity: u32,
        reason: String,
        user_id: String,
        respond_to: Response<StockReceipt>,
    },
    LowStock {
        threshold: u32,
        respond_to: Response<Vec<Product>>,
    },
    History {
        product_id: String,
        respond_to: Response<Vec<Movement>>,
    },
    Report {
        respond_to: Response<InventoryReport>,
    },
    StatusReport {
        threshold: u32,
        respond_to: Response<StockStatusReport>,
    },
}

/// The actor task: owns the engine, drains the channel until every client
/// is dropped.
pub struct InventoryActor {
    receiver: mpsc::Receiver<InventoryCommand>,
    engine: InventoryEngine,
}

impl InventoryActor {
    pub fn new(receiver: mpsc::Receiver<InventoryCommand>, engine: InventoryEngine) -> Self {
        Self { receiver, engine }
    }

    /// Runs the actor's event loop, processing commands until the channel
    /// closes.
    pub async fn run(mut self) {
        info!("Inventory actor started");

        while let Some(command) = self.receiver.recv().await {
            debug!(?command, "Command");
            match command {
                InventoryCommand::CheckAvailability { product_id, quantity, respond_to } => {
                    let available = self.engine.check_availability(&product_id, quantity).await;
                    let _ = respond_to.send(Ok(available));
                }
                InventoryCommand::Add { product_id, quantity, reason, user_id, respond_to } => {
                    let result = self.engine.add(&product_id, quantity, &reason, &user_id).await;
                    Self::log_outcome("add", &product_id, &result);
                    let _ = respond_to.send(result);
                }
                InventoryCommand::Remove { product_id, quantity, reason, user_id, respond_to } => {
                    let result = self.engine.remove(&product_id, quantity, &reason, &user_id).await;
                    Self::log_outcome("remove", &product_id, &result);
                    let _ = respond_to.send(result);
                }
                InventoryCommand::Reserve { product_id, quantity, order_id, respond_to } => {
                    let result = self.engine.reserve(&product_id, quantity, &order_id).await;
                    Self::log_outcome("reserve", &product_id, &result);
                    let _ = respond_to.send(result);
                }
                InventoryCommand::Release { product_id, quantity, order_id, respond_to } => {
                    let result = self.engine.release(&product_id, quantity, &order_id).await;
                    Self::log_outcome("release", &product_id, &result);
                    let _ = respond_to.send(result);
                }
                InventoryCommand::CompleteOrder { order_id, respond_to } => {
                    let result = self.engine.complete_order(&order_id).await;
                    match &result {
                        Ok(settlement) => info!(
                            order_id = %settlement.order_id,
                            units = settlement.units_settled,
                            "Order completed"
                        ),
                        Err(e) => warn!(%order_id, error = %e, "Order completion failed"),
                    }
                    let _ = respond_to.send(result);
                }
                InventoryCommand::ProcessReturn { product_id, quantity, reason, user_id, respond_to } => {
                    let result = self.engine.process_return(&product_id, quantity, &reason, &user_id).await;
                    Self::log_outcome("return", &product_id, &result);
                    let _ = respond_to.send(result);
                }
                InventoryCommand::Adjust { product_id, new_quantity, reason, user_id, respond_to } => {
                    let result = self.engine.adjust(&product_id, new_quantity, &reason, &user_id).await;
                    Self::log_outcome("adjust", &product_id, &result);
                    let _ = respond_to.send(result);
                }
                InventoryCommand::LowStock { threshold, respond_to } => {
                    let products = self.engine.low_stock_products(threshold).await;
                    let _ = respond_to.send(Ok(products));
                }
                InventoryCommand::History { product_id, respond_to } => {
                    let movements = self.engine.history(&product_id).await;
                    let _ = respond_to.send(Ok(movements));
                }
                InventoryCommand::Report { respond_to } => {
                    let report = self.engine.inventory_report().await;
                    let _ = respond_to.send(Ok(report));
                }
                InventoryCommand::StatusReport { threshold, respond_to } => {
                    let report = self.engine.status_report(threshold).await;
                    let _ = respond_to.send(Ok(report));
                }
            }
        }

        info!("Inventory actor shutdown");
    }

    fn log_outcome(op: &str, product_id: &str, result: &Result<StockReceipt, InventoryError>) {
        match result {
            Ok(receipt) => info!(op, product_id, on_hand = receipt.on_hand, "Stock operation ok"),
            Err(e) => warn!(op, product_id, error = %e, "Stock operation failed"),
        }
    }
}

//! Typed async facade over the inventory actor.
//!
//! The client hides the channel plumbing: each method builds an
//! [`InventoryCommand`], sends it, and awaits the one-shot response. Channel
//! failures surface as [`InventoryError::ActorClosed`] /
//! [`InventoryError::ActorDropped`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::engine::{InventoryCommand, InventoryError, DEFAULT_LOW_STOCK_THRESHOLD};
use crate::model::{
    InventoryReport, Movement, OrderSettlement, Product, StockReceipt, StockStatusReport,
};

/// Client for interacting with the inventory actor. Cheap to clone; every
/// clone talks to the same actor.
#[derive(Clone)]
pub struct InventoryClient {
    sender: mpsc::Sender<InventoryCommand>,
}

impl InventoryClient {
    pub fn new(sender: mpsc::Sender<InventoryCommand>) -> Self {
        Self { sender }
    }

    async fn send<T>(
        &self,
        command: InventoryCommand,
        response: oneshot::Receiver<Result<T, InventoryError>>,
    ) -> Result<T, InventoryError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| InventoryError::ActorClosed)?;
        response.await.map_err(|_| InventoryError::ActorDropped)?
    }

    /// True iff the product exists with at least `quantity` on hand.
    #[instrument(skip(self))]
    pub async fn check_availability(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<bool, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::CheckAvailability {
                product_id: product_id.to_string(),
                quantity,
                respond_to,
            },
            response,
        )
        .await
    }

    /// Adds stock and records an `Addition` movement.
    #[instrument(skip(self, reason))]
    pub async fn add(
        &self,
        product_id: &str,
        quantity: u32,
        reason: &str,
        user_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::Add {
                product_id: product_id.to_string(),
                quantity,
                reason: reason.to_string(),
                user_id: user_id.to_string(),
                respond_to,
            },
            response,
        )
        .await
    }

    /// Removes stock and records a `Removal` movement.
    #[instrument(skip(self, reason))]
    pub async fn remove(
        &self,
        product_id: &str,
        quantity: u32,
        reason: &str,
        user_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::Remove {
                product_id: product_id.to_string(),
                quantity,
                reason: reason.to_string(),
                user_id: user_id.to_string(),
                respond_to,
            },
            response,
        )
        .await
    }

    /// Places a soft hold for an order without deducting stock.
    #[instrument(skip(self))]
    pub async fn reserve(
        &self,
        product_id: &str,
        quantity: u32,
        order_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::Reserve {
                product_id: product_id.to_string(),
                quantity,
                order_id: order_id.to_string(),
                respond_to,
            },
            response,
        )
        .await
    }

    /// Drops up to `quantity` held units for the order and product.
    #[instrument(skip(self))]
    pub async fn release(
        &self,
        product_id: &str,
        quantity: u32,
        order_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::Release {
                product_id: product_id.to_string(),
                quantity,
                order_id: order_id.to_string(),
                respond_to,
            },
            response,
        )
        .await
    }

    /// Converts the order's live holds into permanent deductions.
    #[instrument(skip(self))]
    pub async fn complete_order(&self, order_id: &str) -> Result<OrderSettlement, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::CompleteOrder {
                order_id: order_id.to_string(),
                respond_to,
            },
            response,
        )
        .await
    }

    /// Adds returned units back to stock, recording a `Return` movement.
    #[instrument(skip(self, reason))]
    pub async fn process_return(
        &self,
        product_id: &str,
        quantity: u32,
        reason: &str,
        user_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::ProcessReturn {
                product_id: product_id.to_string(),
                quantity,
                reason: reason.to_string(),
                user_id: user_id.to_string(),
                respond_to,
            },
            response,
        )
        .await
    }

    /// Overwrites on-hand stock to an absolute value.
    #[instrument(skip(self, reason))]
    pub async fn adjust(
        &self,
        product_id: &str,
        new_quantity: u32,
        reason: &str,
        user_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::Adjust {
                product_id: product_id.to_string(),
                new_quantity,
                reason: reason.to_string(),
                user_id: user_id.to_string(),
                respond_to,
            },
            response,
        )
        .await
    }

    /// Products at or below the default low-stock threshold.
    pub async fn low_stock_products(&self) -> Result<Vec<Product>, InventoryError> {
        self.low_stock_products_below(DEFAULT_LOW_STOCK_THRESHOLD).await
    }

    /// Products at or below `threshold`.
    #[instrument(skip(self))]
    pub async fn low_stock_products_below(
        &self,
        threshold: u32,
    ) -> Result<Vec<Product>, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(InventoryCommand::LowStock { threshold, respond_to }, response)
            .await
    }

    /// Full movement log for one product, in ledger order.
    #[instrument(skip(self))]
    pub async fn history(&self, product_id: &str) -> Result<Vec<Movement>, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::History {
                product_id: product_id.to_string(),
                respond_to,
            },
            response,
        )
        .await
    }

    /// Aggregate inventory snapshot.
    #[instrument(skip(self))]
    pub async fn inventory_report(&self) -> Result<InventoryReport, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(InventoryCommand::Report { respond_to }, response).await
    }

    /// The catalog partitioned by stock health, default threshold.
    pub async fn status_report(&self) -> Result<StockStatusReport, InventoryError> {
        self.status_report_with_threshold(DEFAULT_LOW_STOCK_THRESHOLD).await
    }

    /// The catalog partitioned by stock health at `threshold`.
    #[instrument(skip(self))]
    pub async fn status_report_with_threshold(
        &self,
        threshold: u32,
    ) -> Result<StockStatusReport, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(
            InventoryCommand::StatusReport { threshold, respond_to },
            response,
        )
        .await
    }
}

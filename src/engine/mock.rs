//! # Mock Inventory
//!
//! Utilities for testing the cart layer in isolation.
//!
//! # Testing Strategy
//! Cart tests should not have to spin up the real inventory actor just to
//! exercise cart logic. [`MockInventory`] hands out an
//! [`InventoryClient`] whose commands are answered by a background task from
//! a queue of expectations. Tests enqueue the responses they expect the cart
//! to need, run the cart operation, then call [`MockInventory::verify`] to
//! assert every expectation was consumed.
//!
//! # Example
//! ```ignore
//! let mut mock = MockInventory::new();
//! mock.expect_check_availability().return_ok(true);
//! mock.expect_reserve().return_err(InventoryError::InsufficientStock {
//!     requested: 5,
//!     available: 2,
//! });
//!
//! let carts = CartService::new(mock.client(), catalog);
//! // ... drive the cart ...
//! mock.verify();
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::clients::InventoryClient;
use crate::model::{OrderSettlement, StockReceipt};

use super::{InventoryCommand, InventoryError};

/// A queued response for one expected command.
enum Expectation {
    CheckAvailability(Result<bool, InventoryError>),
    Reserve(Result<StockReceipt, InventoryError>),
    Release(Result<StockReceipt, InventoryError>),
    CompleteOrder(Result<OrderSettlement, InventoryError>),
}

/// A mock inventory client with expectation tracking.
pub struct MockInventory {
    client: InventoryClient,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockInventory {
    /// Creates a mock with no expectations. Must be called from within a
    /// tokio runtime (it spawns the answering task).
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<InventoryCommand>(100);
        let expectations: Arc<Mutex<VecDeque<Expectation>>> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(command) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();
                match (command, expectation) {
                    (
                        InventoryCommand::CheckAvailability { respond_to, .. },
                        Some(Expectation::CheckAvailability(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        InventoryCommand::Reserve { respond_to, .. },
                        Some(Expectation::Reserve(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        InventoryCommand::Release { respond_to, .. },
                        Some(Expectation::Release(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        InventoryCommand::CompleteOrder { respond_to, .. },
                        Some(Expectation::CompleteOrder(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (command, _) => {
                        panic!("Unexpected inventory command or expectation mismatch: {command:?}");
                    }
                }
            }
        });

        Self {
            client: InventoryClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> InventoryClient {
        self.client.clone()
    }

    pub fn expect_check_availability(&mut self) -> ExpectationBuilder<'_, bool> {
        ExpectationBuilder {
            mock: self,
            wrap: Expectation::CheckAvailability,
        }
    }

    pub fn expect_reserve(&mut self) -> ExpectationBuilder<'_, StockReceipt> {
        ExpectationBuilder {
            mock: self,
            wrap: Expectation::Reserve,
        }
    }

    pub fn expect_release(&mut self) -> ExpectationBuilder<'_, StockReceipt> {
        ExpectationBuilder {
            mock: self,
            wrap: Expectation::Release,
        }
    }

    pub fn expect_complete_order(&mut self) -> ExpectationBuilder<'_, OrderSettlement> {
        ExpectationBuilder {
            mock: self,
            wrap: Expectation::CompleteOrder,
        }
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn push(&self, expectation: Expectation) {
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

impl Default for MockInventory {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent builder: pick the outcome for one expected command.
pub struct ExpectationBuilder<'a, T> {
    mock: &'a MockInventory,
    wrap: fn(Result<T, InventoryError>) -> Expectation,
}

impl<T> ExpectationBuilder<'_, T> {
    pub fn return_ok(self, value: T) {
        self.mock.push((self.wrap)(Ok(value)));
    }

    pub fn return_err(self, error: InventoryError) {
        self.mock.push((self.wrap)(Err(error)));
    }
}

/// A minimal successful receipt for tests that only care about the outcome.
pub fn receipt(product_id: &str, on_hand: u32) -> StockReceipt {
    StockReceipt {
        product_id: product_id.to_string(),
        on_hand,
        message: String::new(),
    }
}

/// A minimal settlement for tests that only care about the outcome.
pub fn settlement(order_id: &str, units: u32) -> OrderSettlement {
    OrderSettlement {
        order_id: order_id.to_string(),
        units_settled: units,
        movements_settled: usize::from(units > 0),
        message: String::new(),
    }
}

//! # Stock Ledger Engine
//!
//! The reservation / commit / release state machine and the direct
//! stock-mutating operations. Every mutation validates, writes the catalog,
//! and appends a ledger movement as one logical unit.
//!
//! ## Reservations live in the ledger
//!
//! A reservation is not a row in some table; it is a `Reserved` movement
//! whose reason embeds the order marker (see
//! [`Movement::reservation_marker`]). Completion re-discovers an order's
//! holds by scanning the ledger for that marker. This avoids a second
//! mutable data structure that could drift from the log, at the cost of a
//! substring scan per completion.
//!
//! ## Idempotent settlement
//!
//! A consumed reservation is superseded by a movement carrying its
//! settlement marker (`[reservation {id}]`): a `Sale` on completion, a
//! zero-delta `Adjustment` on release. [`InventoryEngine::complete_order`]
//! skips any reservation whose marker already appears in the ledger, so
//! re-running completion for an order settles nothing twice.
//!
//! ## Concurrency
//!
//! The engine itself takes `&self` and performs multi-step
//! read-modify-write sequences with no locking. It is only safe because all
//! calls are serialized through the [`InventoryActor`](super::InventoryActor)
//! message loop, which owns the sole instance.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::model::{
    InventoryReport, Movement, MovementKind, OrderSettlement, Product, StockReceipt,
    StockStatusReport,
};
use crate::store::{CatalogStore, MovementLedger};

use super::InventoryError;

/// Threshold below which stock counts as "low" unless the caller overrides it.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// The stock ledger engine. One instance per system, owned by the actor.
pub struct InventoryEngine {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn MovementLedger>,
}

impl InventoryEngine {
    pub fn new(catalog: Arc<dyn CatalogStore>, ledger: Arc<dyn MovementLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// True iff the product exists and has at least `quantity` on hand.
    /// Pure read; outstanding reservations are not subtracted.
    pub async fn check_availability(&self, product_id: &str, quantity: u32) -> bool {
        match self.catalog.get(product_id).await {
            Some(product) => product.stock_quantity >= quantity,
            None => false,
        }
    }

    /// Validates a positive quantity and fetches the product, the shared
    /// precondition of add / remove / return.
    async fn positive_delta_target(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<Product, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }
        self.catalog
            .get(product_id)
            .await
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.to_string()))
    }

    /// Increments on-hand stock and records an `Addition`.
    pub async fn add(
        &self,
        product_id: &str,
        quantity: u32,
        reason: &str,
        user_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        let mut product = self.positive_delta_target(product_id, quantity).await?;
        // Saturate rather than panic on a debug-build overflow.
        product.stock_quantity = product.stock_quantity.saturating_add(quantity);
        let on_hand = product.stock_quantity;
        let name = product.name.clone();
        self.catalog.update(product).await;

        self.ledger
            .append(Movement::new(
                product_id,
                i64::from(quantity),
                MovementKind::Addition,
                reason,
                user_id,
            ))
            .await;

        Ok(StockReceipt {
            product_id: product_id.to_string(),
            on_hand,
            message: format!("{quantity} units added to stock of {name}"),
        })
    }

    /// Decrements on-hand stock and records a `Removal`.
    pub async fn remove(
        &self,
        product_id: &str,
        quantity: u32,
        reason: &str,
        user_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        let mut product = self.positive_delta_target(product_id, quantity).await?;
        if product.stock_quantity < quantity {
            return Err(InventoryError::InsufficientStock {
                requested: quantity,
                available: product.stock_quantity,
            });
        }
        product.stock_quantity -= quantity;
        let on_hand = product.stock_quantity;
        let name = product.name.clone();
        self.catalog.update(product).await;

        self.ledger
            .append(Movement::new(
                product_id,
                -i64::from(quantity),
                MovementKind::Removal,
                reason,
                user_id,
            ))
            .await;

        Ok(StockReceipt {
            product_id: product_id.to_string(),
            on_hand,
            message: format!("{quantity} units removed from stock of {name}"),
        })
    }

    /// Places a soft hold: records a `Reserved` movement without touching
    /// on-hand stock. Availability is checked against raw on-hand quantity;
    /// earlier holds are not subtracted.
    pub async fn reserve(
        &self,
        product_id: &str,
        quantity: u32,
        order_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        let product = self
            .catalog
            .get(product_id)
            .await
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.to_string()))?;
        if product.stock_quantity < quantity {
            return Err(InventoryError::InsufficientStock {
                requested: quantity,
                available: product.stock_quantity,
            });
        }

        self.ledger
            .append(Movement::new(
                product_id,
                i64::from(quantity),
                MovementKind::Reserved,
                Movement::reservation_marker(order_id),
                order_id,
            ))
            .await;

        Ok(StockReceipt {
            product_id: product_id.to_string(),
            on_hand: product.stock_quantity,
            message: format!(
                "{quantity} units of {} reserved for order {order_id}",
                product.name
            ),
        })
    }

    /// An order's reservations that no later movement has settled or
    /// released yet, in ledger order.
    async fn live_reservations(&self, order_id: &str) -> Vec<Movement> {
        let marker = Movement::reservation_marker(order_id);
        // The scan over-matches: it is case-insensitive, also hits release
        // markers ("Released reservation for order ..."), and one order id
        // can be a prefix of another. Reserved movements carry the exact
        // order id in user_id, so filter on both.
        let matches = self.ledger.by_reason_contains(&marker).await;
        let mut live = Vec::new();
        for movement in matches
            .into_iter()
            .filter(|m| m.kind == MovementKind::Reserved && m.user_id == order_id)
        {
            let settled = self
                .ledger
                .by_reason_contains(&Movement::settlement_marker(movement.id))
                .await;
            if settled.is_empty() {
                live.push(movement);
            }
        }
        live
    }

    /// Converts every live reservation for the order into a permanent
    /// deduction, recording one `Sale` per reservation.
    ///
    /// Always succeeds: completing an order with no live reservations is a
    /// no-op, and re-running completion settles nothing twice. The deduction
    /// clamps at zero so on-hand stock never goes negative even when stock
    /// shrank between reservation and completion.
    pub async fn complete_order(&self, order_id: &str) -> Result<OrderSettlement, InventoryError> {
        let reservations = self.live_reservations(order_id).await;
        debug!(order_id, count = reservations.len(), "Settling reservations");

        let mut units_settled = 0u32;
        let mut movements_settled = 0usize;
        for reservation in reservations {
            let Some(mut product) = self.catalog.get(&reservation.product_id).await else {
                // Product vanished since the hold was taken; leave the
                // reservation live so a later completion can retry.
                warn!(
                    order_id,
                    product_id = %reservation.product_id,
                    "Reserved product missing at completion"
                );
                continue;
            };

            let held = u32::try_from(reservation.quantity).unwrap_or(0);
            let deducted = held.min(product.stock_quantity);
            if deducted < held {
                warn!(
                    order_id,
                    product_id = %reservation.product_id,
                    held,
                    available = product.stock_quantity,
                    "Hold exceeds on-hand stock; deduction clamped"
                );
            }
            product.stock_quantity -= deducted;
            self.catalog.update(product).await;

            self.ledger
                .append(Movement::new(
                    &reservation.product_id,
                    -i64::from(deducted),
                    MovementKind::Sale,
                    format!(
                        "Sale confirmed for order {order_id} {}",
                        Movement::settlement_marker(reservation.id)
                    ),
                    order_id,
                ))
                .await;

            units_settled = units_settled.saturating_add(deducted);
            movements_settled += 1;
        }

        Ok(OrderSettlement {
            order_id: order_id.to_string(),
            units_settled,
            movements_settled,
            message: format!("Stock updated for order {order_id}"),
        })
    }

    /// Drops holds for the order and product until exactly `quantity` units
    /// are released or no live reservation remains. On-hand stock is
    /// untouched (holds never deducted it).
    ///
    /// The release record is a zero-delta `Adjustment` carrying the
    /// reservation's settlement marker, which hides the hold from any later
    /// [`complete_order`](Self::complete_order). A hold larger than the
    /// remaining quantity is split: the reservation is retired and its
    /// uncovered remainder re-reserved under the same order, so the order's
    /// live holds shrink by exactly `quantity`.
    pub async fn release(
        &self,
        product_id: &str,
        quantity: u32,
        order_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        let product = self
            .catalog
            .get(product_id)
            .await
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.to_string()))?;

        let mut remaining = quantity;
        let mut released = 0u32;
        for reservation in self
            .live_reservations(order_id)
            .await
            .into_iter()
            .filter(|m| m.product_id == product_id)
        {
            if remaining == 0 {
                break;
            }
            self.ledger
                .append(Movement::new(
                    product_id,
                    0,
                    MovementKind::Adjustment,
                    format!(
                        "Released reservation for order {order_id} {}",
                        Movement::settlement_marker(reservation.id)
                    ),
                    order_id,
                ))
                .await;

            let held = u32::try_from(reservation.quantity).unwrap_or(0);
            if held > remaining {
                // Keep the uncovered portion of the hold alive.
                self.ledger
                    .append(Movement::new(
                        product_id,
                        i64::from(held - remaining),
                        MovementKind::Reserved,
                        Movement::reservation_marker(order_id),
                        order_id,
                    ))
                    .await;
            }
            let covered = held.min(remaining);
            released = released.saturating_add(covered);
            remaining -= covered;
        }

        Ok(StockReceipt {
            product_id: product_id.to_string(),
            on_hand: product.stock_quantity,
            message: format!(
                "Released {released} reserved units of {} for order {order_id}",
                product.name
            ),
        })
    }

    /// Adds returned units back to stock and records a `Return`.
    pub async fn process_return(
        &self,
        product_id: &str,
        quantity: u32,
        reason: &str,
        user_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        let mut product = self.positive_delta_target(product_id, quantity).await?;
        product.stock_quantity = product.stock_quantity.saturating_add(quantity);
        let on_hand = product.stock_quantity;
        let name = product.name.clone();
        self.catalog.update(product).await;

        self.ledger
            .append(Movement::new(
                product_id,
                i64::from(quantity),
                MovementKind::Return,
                reason,
                user_id,
            ))
            .await;

        Ok(StockReceipt {
            product_id: product_id.to_string(),
            on_hand,
            message: format!("{quantity} units returned to stock of {name}"),
        })
    }

    /// Overwrites on-hand stock to exactly `new_quantity`, recording an
    /// `Adjustment` whose delta is `new - previous` (any sign, possibly 0).
    pub async fn adjust(
        &self,
        product_id: &str,
        new_quantity: u32,
        reason: &str,
        user_id: &str,
    ) -> Result<StockReceipt, InventoryError> {
        let mut product = self
            .catalog
            .get(product_id)
            .await
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.to_string()))?;

        let delta = i64::from(new_quantity) - i64::from(product.stock_quantity);
        product.stock_quantity = new_quantity;
        let name = product.name.clone();
        self.catalog.update(product).await;

        self.ledger
            .append(Movement::new(
                product_id,
                delta,
                MovementKind::Adjustment,
                reason,
                user_id,
            ))
            .await;

        let direction = if delta >= 0 { "increased" } else { "reduced" };
        Ok(StockReceipt {
            product_id: product_id.to_string(),
            on_hand: new_quantity,
            message: format!("Stock of {name} {direction} to {new_quantity} units"),
        })
    }

    /// Products with on-hand stock at or below `threshold`.
    pub async fn low_stock_products(&self, threshold: u32) -> Vec<Product> {
        self.catalog
            .list()
            .await
            .into_iter()
            .filter(|p| p.stock_quantity <= threshold)
            .collect()
    }

    /// Full chronological movement log for one product.
    pub async fn history(&self, product_id: &str) -> Vec<Movement> {
        self.ledger.by_product(product_id).await
    }

    /// Aggregate snapshot of the whole catalog. Valuation uses base prices.
    pub async fn inventory_report(&self) -> InventoryReport {
        let products = self.catalog.list().await;
        InventoryReport {
            total_products: products.len(),
            total_units: products.iter().map(|p| u64::from(p.stock_quantity)).sum(),
            out_of_stock_products: products.iter().filter(|p| p.stock_quantity == 0).count(),
            low_stock_products: products
                .iter()
                .filter(|p| p.stock_quantity > 0 && p.stock_quantity <= DEFAULT_LOW_STOCK_THRESHOLD)
                .count(),
            inventory_value: products
                .iter()
                .map(|p| p.price * f64::from(p.stock_quantity))
                .sum(),
            generated_at: Utc::now(),
        }
    }

    /// Partitions the catalog by stock health, from a single listing so the
    /// three partitions reflect one consistent snapshot.
    pub async fn status_report(&self, threshold: u32) -> StockStatusReport {
        let products = self.catalog.list().await;
        let mut report = StockStatusReport {
            out_of_stock: Vec::new(),
            low_stock: Vec::new(),
            healthy_stock: Vec::new(),
        };
        for product in products {
            if product.stock_quantity == 0 {
                report.out_of_stock.push(product);
            } else if product.stock_quantity <= threshold {
                report.low_stock.push(product);
            } else {
                report.healthy_stock.push(product);
            }
        }
        report
    }
}

//! Ledger movements: the append-only record of every stock change or hold.
//!
//! # Architecture Note
//! There is no first-class "Reservation" entity in this system. A reservation
//! *is* a [`Movement`] of kind [`MovementKind::Reserved`] whose reason embeds
//! the owning order id as a matchable marker (see
//! [`Movement::reservation_marker`]). The ledger is therefore both the audit
//! trail and the source of truth for what is currently on hold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Stock received (restock, delivery).
    Addition,
    /// Stock taken out directly (damage, shrinkage, manual removal).
    Removal,
    /// A soft hold against stock; on-hand quantity is untouched.
    Reserved,
    /// A reservation converted into a permanent deduction.
    Sale,
    /// On-hand overwritten to an absolute value; delta may be any sign.
    Adjustment,
    /// Customer return added back to stock.
    Return,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MovementKind::Addition => "Addition",
            MovementKind::Removal => "Removal",
            MovementKind::Reserved => "Reserved",
            MovementKind::Sale => "Sale",
            MovementKind::Adjustment => "Adjustment",
            MovementKind::Return => "Return",
        };
        f.write_str(name)
    }
}

/// One immutable, timestamped entry in the movement ledger.
///
/// `quantity` is a signed delta: positive for stock increases and for
/// reservations (the held amount), negative for decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Monotonic id, assigned by the ledger on append when left at 0.
    pub id: u64,
    pub product_id: String,
    pub quantity: i64,
    pub kind: MovementKind,
    pub reason: String,
    /// Actor that caused the movement; order id for reservation traffic.
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

impl Movement {
    /// Creates an unappended movement (id 0, stamped now). The ledger assigns
    /// the real id on append.
    pub fn new(
        product_id: impl Into<String>,
        quantity: i64,
        kind: MovementKind,
        reason: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            product_id: product_id.into(),
            quantity,
            kind,
            reason: reason.into(),
            user_id: user_id.into(),
            timestamp: Utc::now(),
        }
    }

    /// The substring that ties a `Reserved` movement to its order. Scanning
    /// for this marker is how completion locates an order's holds.
    pub fn reservation_marker(order_id: &str) -> String {
        format!("Reservation for order {order_id}")
    }

    /// The substring that marks a specific reservation as settled or
    /// released. The closing bracket keeps `[reservation 1]` from matching
    /// `[reservation 12]`.
    pub fn settlement_marker(reservation_id: u64) -> String {
        format!("[reservation {reservation_id}]")
    }
}

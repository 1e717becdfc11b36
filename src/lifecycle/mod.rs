//! Runtime orchestration and lifecycle management.
//!
//! # Main Components
//!
//! - [`StockSystem`] - wires the stores, the inventory actor, and the cart
//!   service, and coordinates graceful shutdown
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod stock_system;
pub mod tracing;

pub use stock_system::*;
pub use self::tracing::setup_tracing;

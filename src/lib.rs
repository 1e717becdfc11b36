//! # Stockroom
//!
//! > **A stock ledger with reservation / commit semantics, built on
//! > message-passing actors.**
//!
//! This crate tracks product stock levels and mediates between shopping
//! carts and an append-only movement ledger so that concurrent shoppers
//! cannot oversell inventory.
//!
//! ## Design Philosophy
//!
//! ### The ledger is the source of truth
//! Every stock change or hold is an immutable [`Movement`](model::Movement)
//! appended to the ledger. Reservations have no table of their own: a
//! reservation *is* a `Reserved` movement whose reason embeds the owning
//! order id, and order completion re-discovers holds by scanning for that
//! marker. There is no second mutable structure that could drift from the
//! log.
//!
//! ### Single-writer concurrency
//! Every engine operation is a multi-step read-modify-write against the
//! catalog and ledger. Rather than sprinkling locks, the
//! [`InventoryActor`](engine::InventoryActor) owns the engine and processes
//! commands sequentially in its own Tokio task; clients talk to it through
//! channels. No two stock operations ever interleave, so the
//! check-then-mutate window of the naive design is closed by construction.
//!
//! ### Injected collaborators
//! The engine never owns storage. The [`CatalogStore`](store::CatalogStore)
//! and [`MovementLedger`](store::MovementLedger) traits are the seams where
//! a host process plugs in real persistence; in-memory implementations back
//! the default wiring and the tests.
//!
//! ## Module Tour
//!
//! ### 1. The Data ([`model`])
//! Products, ledger movements, carts, and the report value objects.
//!
//! ### 2. The Seams ([`store`])
//! The collaborator traits plus [`InMemoryCatalog`](store::InMemoryCatalog)
//! and [`InMemoryLedger`](store::InMemoryLedger).
//!
//! ### 3. The Engine ([`engine`])
//! The reservation / commit / release state machine
//! ([`InventoryEngine`](engine::InventoryEngine)), the actor that serializes
//! it, the [`InventoryError`](engine::InventoryError) taxonomy, and the
//! [`mock`](engine::mock) inventory for isolated cart tests.
//!
//! ### 4. The Interface ([`clients`])
//! [`InventoryClient`](clients::InventoryClient): the typed async facade
//! that hides the channel plumbing.
//!
//! ### 5. The Cart ([`cart`])
//! [`CartService`](cart::CartService): session carts that reserve on add,
//! release on remove/clear/abandon, and settle on finalize.
//!
//! ### 6. The Orchestrator ([`lifecycle`])
//! [`StockSystem`](lifecycle::StockSystem) wires everything together and
//! shuts it down gracefully; [`setup_tracing`](lifecycle::setup_tracing)
//! initializes logging.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stockroom::lifecycle::StockSystem;
//! use stockroom::model::Product;
//!
//! let system = StockSystem::new();
//! let wine = system.catalog.create(Product::new("", "Barolo DOCG", 90.0, 24)).await;
//!
//! let cart = system.carts.get_or_create_cart("alice").await;
//! system.carts.add_item_with_reservation(&cart.id, &wine.id, 2, "alice").await?;
//! let settlement = system.carts.finalize(&cart.id).await?;
//! assert_eq!(settlement.units_settled, 2);
//!
//! system.shutdown().await?;
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod cart;
pub mod clients;
pub mod engine;
pub mod lifecycle;
pub mod model;
pub mod store;

//! # Observability & Tracing
//!
//! Structured logging setup for the whole system.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: startup, shutdown
//! - **Stock operations**: every add / remove / reserve / release /
//!   settlement, with product ids and resulting on-hand quantities
//! - **Cart flow**: cart creation, finalize, abandon
//! - **Errors**: failure reasons with the offending ids attached
//!
//! ## Usage
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo test -- --nocapture
//!
//! # Show full command payloads
//! RUST_LOG=debug cargo test -- --nocapture
//!
//! # Filter to the engine only
//! RUST_LOG=stockroom::engine=debug cargo test -- --nocapture
//! ```
//!
//! Client methods log the full request once at `debug` level on entry; the
//! `info` stream stays compact, showing only the operation flow.

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Keep log lines short; operations carry their own ids
        .compact()
        .init();
}

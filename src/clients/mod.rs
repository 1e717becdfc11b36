//! Type-safe wrappers around the actor channel.

pub mod inventory_client;

pub use inventory_client::*;

//! Pure data structures: products, ledger movements, carts, and report shapes.

pub mod cart;
pub mod movement;
pub mod product;
pub mod report;

pub use cart::*;
pub use movement::*;
pub use product::*;
pub use report::*;

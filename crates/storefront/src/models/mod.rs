//! Domain models for the storefront state core.
//!
//! These are the persisted shapes: field names and casing match the JSON the
//! PlugOn front end has always written to local storage.

pub mod cart;
pub mod product;
pub mod session;

pub use cart::{CartLine, OrderSummary};
pub use product::{Category, Product};
pub use session::{Identity, keys};

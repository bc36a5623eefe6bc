//! In-memory state holders with write-through persistence.
//!
//! - [`SessionStore`] - the logged-in identity and role checks
//! - [`CartStore`] - cart lines, totals and the order summary

mod cart;
mod observer;
mod session;

pub use cart::{CartError, CartEvent, CartStore};
pub use observer::{Observers, SubscriptionId};
pub use session::{DASHBOARD_PATH, HOME_PATH, SessionEvent, SessionStore};

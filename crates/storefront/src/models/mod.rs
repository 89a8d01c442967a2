//! Domain models for storefront.
//!
//! Everything here is stored in the visitor's session as JSON; nothing is
//! persisted beyond it.

pub mod cart;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, CartStore, LineKey, MAX_LINE_QUANTITY};
pub use session::{AuthState, ShopperState, keys as session_keys};
pub use user::User;

//! Session-related types.
//!
//! Everything a shopper accumulates lives in their session: cart, sign-in
//! state, queued toasts and the checkout in progress. Handlers load a
//! [`ShopperState`], mutate it synchronously and save it back.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::cart::Cart;
use super::user::User;
use crate::checkout::CheckoutSession;
use crate::notify::ToastQueue;

/// Session-stored sign-in state.
///
/// "Authenticated" means a token is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
}

/// Session keys.
pub mod keys {
    /// Key for the shopper's cart.
    pub const CART: &str = "cart";

    /// Key for sign-in state.
    pub const AUTH: &str = "auth";

    /// Key for toasts waiting to be shown.
    pub const TOASTS: &str = "toasts";

    /// Key for the checkout in progress.
    pub const CHECKOUT: &str = "checkout";
}

/// A shopper's session data, loaded as one unit.
#[derive(Debug, Clone, Default)]
pub struct ShopperState {
    pub cart: Cart,
    pub auth: AuthState,
    pub toasts: ToastQueue,
    pub checkout: CheckoutSession,
}

impl ShopperState {
    /// Load from the session. Missing keys start empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails or a value cannot be
    /// deserialized.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(Self {
            cart: session.get(keys::CART).await?.unwrap_or_default(),
            auth: session.get(keys::AUTH).await?.unwrap_or_default(),
            toasts: session.get(keys::TOASTS).await?.unwrap_or_default(),
            checkout: session.get(keys::CHECKOUT).await?.unwrap_or_default(),
        })
    }

    /// Write every part back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::CART, &self.cart).await?;
        session.insert(keys::AUTH, &self.auth).await?;
        session.insert(keys::TOASTS, &self.toasts).await?;
        session.insert(keys::CHECKOUT, &self.checkout).await?;
        Ok(())
    }
}

//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add a catalog product
//! POST /cart/update            - Change a line's quantity
//! POST /cart/remove            - Remove a line
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Current step
//! POST /checkout/guest         - Continue as guest
//! POST /checkout/login         - Simulated sign-in
//! POST /checkout/customer      - Guest contact details
//! POST /checkout/shipping      - Shipping address
//! POST /checkout/payment       - Payment and order placement
//! POST /checkout/back          - Previous step
//! POST /checkout/reset         - Start over
//! ```

pub mod cart;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::notify::ToastQueue;
use crate::state::AppState;

/// Toast display data for templates.
#[derive(Debug, Clone)]
pub struct ToastView {
    pub message: String,
    pub severity: &'static str,
}

impl ToastView {
    /// Take every queued toast for display. Each toast is shown once.
    pub fn drain(queue: &mut ToastQueue) -> Vec<Self> {
        queue
            .drain()
            .into_iter()
            .map(|toast| Self {
                message: toast.message,
                severity: toast.severity.as_str(),
            })
            .collect()
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/guest", post(checkout::guest))
        .route("/login", post(checkout::login))
        .route("/customer", post(checkout::customer))
        .route("/shipping", post(checkout::shipping))
        .route("/payment", post(checkout::payment))
        .route("/back", post(checkout::back))
        .route("/reset", post(checkout::reset))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { axum::response::Redirect::to("/cart") }))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}

//! Integration tests for Larkspur.
//!
//! Each test spawns the full storefront router on an ephemeral port and
//! drives it over HTTP with a cookie-keeping client, the way a browser
//! would. No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p larkspur-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart page, mutations and the count badge
//! - `storefront_checkout` - The checkout walk from sign-in to confirmation

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::time::Duration;

use larkspur_storefront::{config::StorefrontConfig, state::AppState};
use reqwest::{Client, Response, StatusCode};
use tokio::net::TcpListener;

/// A running storefront and a client holding one shopper's session.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Start a storefront with an instant sign-in and an empty cart.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Start a storefront that seeds the demo lines at checkout.
    pub async fn with_demo_cart() -> Self {
        Self::with_config(StorefrontConfig {
            demo_cart: true,
            ..test_config()
        })
        .await
    }

    /// Start a storefront with `config`, bound to an ephemeral local port.
    pub async fn with_config(config: StorefrontConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = larkspur_storefront::app(AppState::new(config));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return the body, asserting a 200.
    pub async fn page(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
        resp.text().await.expect("Failed to read body")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form. Redirects are followed, so a successful post answers
    /// with the page it redirected to.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Put one catalog product in the cart.
    pub async fn add_to_cart(&self, product_id: &str, color: &str, size: &str, quantity: &str) {
        let resp = self
            .post(
                "/cart/add",
                &[
                    ("product_id", product_id),
                    ("color", color),
                    ("size", size),
                    ("quantity", quantity),
                ],
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        login_delay: Duration::ZERO,
        ..StorefrontConfig::default()
    }
}

/// Guest contact details that pass validation.
pub const GUEST: &[(&str, &str)] = &[
    ("email", "jane@example.com"),
    ("first_name", "Jane"),
    ("last_name", "Doe"),
    ("phone", "5551234567"),
];

/// A full shipping form with billing mirrored.
pub const SHIPPING: &[(&str, &str)] = &[
    ("first_name", "Jane"),
    ("last_name", "Doe"),
    ("email", "jane@example.com"),
    ("phone", "5551234567"),
    ("address1", "12 Garden Row"),
    ("city", "Austin"),
    ("state", "Texas"),
    ("zip_code", "78701"),
    ("country", "US"),
    ("same_as_billing", "on"),
];

/// Card details that pass validation until the end of 2099.
pub const PAYMENT: &[(&str, &str)] = &[
    ("card_number", "4242 4242 4242 4242"),
    ("name_on_card", "Jane Doe"),
    ("expiry_date", "12/99"),
    ("cvv", "123"),
];

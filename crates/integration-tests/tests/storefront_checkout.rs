//! Integration tests for the checkout walk.

#![allow(clippy::unwrap_used)]

use larkspur_integration_tests::{GUEST, PAYMENT, SHIPPING, TestContext};
use reqwest::StatusCode;

fn form_of(body: &str) -> &str {
    let start = body.find("data-form=\"").unwrap() + "data-form=\"".len();
    let rest = body.get(start..).unwrap();
    rest.get(..rest.find('"').unwrap()).unwrap()
}

/// Cart with one dress, signed out, on the guest form.
async fn guest_with_dress() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("1", "#FADBC0", "M", "1").await;
    let resp = ctx.post("/checkout/guest", &[]).await;
    assert_eq!(form_of(&resp.text().await.unwrap()), "guest");
    ctx
}

#[tokio::test]
async fn test_empty_cart_redirects_to_cart() {
    let ctx = TestContext::new().await;
    let resp = ctx.get("/checkout").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/cart");
}

#[tokio::test]
async fn test_starts_at_sign_in() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("5", "", "", "1").await;

    let body = ctx.page("/checkout").await;
    assert_eq!(form_of(&body), "login");
    assert!(body.contains("Continue as Guest"));
    assert!(body.contains("data-status=\"current\""));
    assert!(body.contains("Summer Straw Hat"), "order summary lists the cart");
}

#[tokio::test]
async fn test_guest_checkout_to_confirmation() {
    let ctx = guest_with_dress().await;

    let resp = ctx.post("/checkout/customer", GUEST).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert_eq!(form_of(&body), "shipping");
    assert!(body.contains("value=\"jane@example.com\""));

    let body = ctx.post("/checkout/shipping", SHIPPING).await.text().await.unwrap();
    assert_eq!(form_of(&body), "payment");

    let resp = ctx.post("/checkout/payment", PAYMENT).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert_eq!(form_of(&body), "confirmation");
    assert!(body.contains("Thank You for Your Order!"));
    assert!(body.contains("ORD-"));
    assert!(body.contains("Your order has been placed successfully!"));
    assert!(body.contains("12 Garden Row"));
    assert!(!body.contains("class=\"steps\""), "no progress bar on confirmation");

    // The cart was cleared; the confirmation survives a reload.
    assert!(ctx.page("/cart/count").await.contains(">0<"));
    let body = ctx.page("/checkout").await;
    assert_eq!(form_of(&body), "confirmation");
    assert!(body.contains("$79.99"), "totals captured before the cart cleared");
}

#[tokio::test]
async fn test_guest_form_errors() {
    let ctx = guest_with_dress().await;

    let resp = ctx
        .post("/checkout/customer", &[("email", "jane"), ("phone", "12-34")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert_eq!(form_of(&body), "guest");
    assert!(body.contains("Email is invalid"));
    assert!(body.contains("First name is required"));
    assert!(body.contains("Last name is required"));
    assert!(body.contains("Phone number is invalid"));
    assert!(body.contains("value=\"jane\""), "entered values are kept");

    // Still on the guest form after a reload, without the errors.
    let body = ctx.page("/checkout").await;
    assert_eq!(form_of(&body), "guest");
    assert!(!body.contains("class=\"field-error\""));
}

#[tokio::test]
async fn test_shipping_errors() {
    let ctx = guest_with_dress().await;
    ctx.post("/checkout/customer", GUEST).await;

    let resp = ctx
        .post("/checkout/shipping", &[("address1", "   "), ("same_as_billing", "on")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert_eq!(form_of(&body), "shipping");
    assert!(body.contains("Address is required"));
    assert!(body.contains("City is required"));
    assert!(body.contains("State is required"));
    assert!(body.contains("Zip code is required"));
}

#[tokio::test]
async fn test_payment_errors_keep_cart() {
    let ctx = guest_with_dress().await;
    ctx.post("/checkout/customer", GUEST).await;
    ctx.post("/checkout/shipping", SHIPPING).await;

    let resp = ctx
        .post(
            "/checkout/payment",
            &[
                ("card_number", "4242"),
                ("name_on_card", ""),
                ("expiry_date", "01/20"),
                ("cvv", "12"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert_eq!(form_of(&body), "payment");
    assert!(body.contains("Card number must be 16 digits"));
    assert!(body.contains("Name on card is required"));
    assert!(body.contains("Card is expired"));
    assert!(body.contains("CVV must be 3 or 4 digits"));

    let resp = ctx
        .post("/checkout/payment", &[("expiry_date", "13/30")])
        .await;
    assert!(resp.text().await.unwrap().contains("Expiry month is invalid"));

    assert!(ctx.page("/cart/count").await.contains(">1<"));
}

#[tokio::test]
async fn test_back_keeps_entered_data() {
    let ctx = guest_with_dress().await;
    ctx.post("/checkout/customer", GUEST).await;

    let body = ctx.post("/checkout/back", &[]).await.text().await.unwrap();
    assert_eq!(form_of(&body), "guest");
    assert!(body.contains("value=\"Jane\""));
}

#[tokio::test]
async fn test_out_of_step_post_is_ignored() {
    let ctx = guest_with_dress().await;

    let resp = ctx.post("/checkout/payment", PAYMENT).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(form_of(&resp.text().await.unwrap()), "guest");
    assert!(ctx.page("/cart/count").await.contains(">1<"));
}

#[tokio::test]
async fn test_login_skips_to_shipping() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("5", "", "", "1").await;

    let resp = ctx
        .post(
            "/checkout/login",
            &[("email", "jane@example.com"), ("password", "hunter2")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert_eq!(form_of(&body), "shipping");
    assert!(body.contains("Login successful"));
    assert!(body.contains("value=\"jane@example.com\""));
    assert!(body.contains("data-status=\"complete\""));

    // Signed-in shoppers cannot step back onto the sign-in form.
    let body = ctx.post("/checkout/back", &[]).await.text().await.unwrap();
    assert_eq!(form_of(&body), "shipping");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("5", "", "", "1").await;

    let resp = ctx
        .post("/checkout/login", &[("email", "jane@example.com"), ("password", "")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert_eq!(form_of(&body), "login");
    assert!(body.contains("Password is required"));
    assert!(body.contains("value=\"jane@example.com\""));
}

#[tokio::test]
async fn test_login_malformed_email_shown_inline() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("5", "", "", "1").await;

    let resp = ctx
        .post("/checkout/login", &[("email", "not-an-email"), ("password", "x")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert_eq!(form_of(&body), "login");
    assert!(body.contains("Email is invalid"));
    assert!(!body.contains("Login failed"));
}

#[tokio::test]
async fn test_login_rejected() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("5", "", "", "1").await;

    // Passes the form check but has an empty top-level domain.
    let body = ctx
        .post("/checkout/login", &[("email", "jane@example.com."), ("password", "x")])
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(form_of(&body), "login");
    assert!(body.contains("Login failed. Please try again."));
}

#[tokio::test]
async fn test_reset_after_order_returns_to_cart() {
    let ctx = guest_with_dress().await;
    ctx.post("/checkout/customer", GUEST).await;
    ctx.post("/checkout/shipping", SHIPPING).await;
    ctx.post("/checkout/payment", PAYMENT).await;

    let resp = ctx.post("/checkout/reset", &[]).await;
    assert_eq!(resp.url().path(), "/cart");
}

#[tokio::test]
async fn test_demo_cart_is_seeded() {
    let ctx = TestContext::with_demo_cart().await;

    let body = ctx.page("/checkout").await;
    assert_eq!(form_of(&body), "login");
    assert!(body.contains("Floral Summer Dress"));
    assert!(body.contains("Statement Earrings"));
    assert!(ctx.page("/cart/count").await.contains(">2<"));
}

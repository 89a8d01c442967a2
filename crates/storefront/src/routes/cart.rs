//! Cart route handlers.
//!
//! The cart lives in the session. Mutations redirect back to the cart page so
//! a reload never repeats them.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use larkspur_core::{Price, ProductId, Severity};

use super::ToastView;
use crate::checkout::{OrderTotals, PricingPolicy};
use crate::error::{AppError, Result};
use crate::models::{CartItem, CartStore, LineKey, MAX_LINE_QUANTITY, ShopperState};
use crate::notify::Notifier;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    pub image: String,
    pub color: String,
    pub size: String,
    pub show_color: bool,
    pub quantity: u32,
    pub price: String,
    /// List price shown struck through when on sale.
    pub compare_at: Option<String>,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.as_i32(),
            name: item.name.clone(),
            image: item.image.clone(),
            color: item.variant_color.clone(),
            size: item.variant_size.clone(),
            show_color: item.variant_color != crate::catalog::DEFAULT_COLOR,
            quantity: item.quantity,
            price: Price::usd(item.unit_price()).display(),
            compare_at: item
                .sale_price
                .map(|_| Price::usd(item.price).display()),
            line_price: Price::usd(item.line_total()).display(),
        }
    }
}

/// Cart and totals display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
    /// Amount still needed for free shipping, if any.
    pub free_shipping_gap: Option<String>,
}

impl CartView {
    /// Build from session cart lines and the pricing policy.
    #[must_use]
    pub fn new<C: CartStore + ?Sized>(cart: &C, policy: &PricingPolicy) -> Self {
        let totals = policy.totals(cart.total());
        let item_count = cart.count();
        Self::from_parts(
            cart.items().iter().map(CartItemView::from).collect(),
            item_count,
            &totals,
            policy,
        )
    }

    /// Build from already-captured totals.
    #[must_use]
    pub fn from_parts(
        items: Vec<CartItemView>,
        item_count: u32,
        totals: &OrderTotals,
        policy: &PricingPolicy,
    ) -> Self {
        let gap = policy.free_shipping_threshold - totals.subtotal;
        Self {
            items,
            item_count,
            subtotal: totals.subtotal_display(),
            shipping: totals.shipping_display(),
            tax: totals.tax_display(),
            total: totals.total_display(),
            free_shipping_gap: (item_count > 0 && gap.is_sign_positive() && !gap.is_zero())
                .then(|| Price::usd(gap).display()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub color: String,
    pub size: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
    pub color: String,
    pub size: String,
}

fn line_key(product_id: i32, color: String, size: String) -> LineKey {
    LineKey {
        product_id: ProductId::new(product_id),
        variant_color: color,
        variant_size: size,
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u32,
    pub toasts: Vec<ToastView>,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u32,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let mut shopper = ShopperState::load(&session).await?;
    let toasts = ToastView::drain(&mut shopper.toasts);
    shopper.save(&session).await?;

    Ok(CartShowTemplate {
        cart: CartView::new(&shopper.cart, &state.config().pricing),
        cart_count: shopper.cart.count(),
        toasts,
    })
}

/// Add a catalog product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .find_by_id(ProductId::new(form.product_id))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let (color, size) = product.variant(&form.color, &form.size).ok_or_else(|| {
        AppError::BadRequest(format!("unknown variant {}/{}", form.color, form.size))
    })?;

    let quantity = form.quantity.unwrap_or(1).clamp(1, MAX_LINE_QUANTITY);

    let mut shopper = ShopperState::load(&session).await?;
    shopper
        .cart
        .add_item(product.cart_item(color, size, quantity));
    shopper
        .toasts
        .notify(&format!("{} added to cart", product.name), Severity::Success);
    shopper.save(&session).await?;

    tracing::info!(product_id = form.product_id, quantity, "added to cart");

    Ok(Redirect::to("/cart").into_response())
}

/// Change a line's quantity. Zero removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut shopper = ShopperState::load(&session).await?;
    let key = line_key(form.product_id, form.color, form.size);
    let quantity = form.quantity.min(MAX_LINE_QUANTITY);

    if !shopper.cart.update_quantity(&key, quantity) {
        tracing::debug!(product_id = form.product_id, "update for missing cart line");
    }
    shopper.save(&session).await?;

    Ok(Redirect::to("/cart").into_response())
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut shopper = ShopperState::load(&session).await?;
    let key = line_key(form.product_id, form.color, form.size);

    if shopper.cart.remove_item(&key) {
        shopper
            .toasts
            .notify("Item removed from cart", Severity::Info);
    }
    shopper.save(&session).await?;

    Ok(Redirect::to("/cart").into_response())
}

/// Cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let shopper = ShopperState::load(&session).await?;
    Ok(CartCountTemplate {
        cart_count: shopper.cart.count(),
    })
}

//! Checkout route handlers.
//!
//! `GET /checkout` renders whatever step the shopper is on. Each form posts
//! to its own endpoint; a successful post redirects back to `GET /checkout`,
//! so every step change lands on a fresh page scrolled to the top. A post
//! that fails validation re-renders the page with inline errors.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use larkspur_core::StepStatus;

use super::ToastView;
use super::cart::CartView;
use crate::checkout::{
    Address, AddressPatch, CheckoutData, CheckoutSession, Customer, CustomerPatch, FieldErrors,
    OrderConfirmation, PaymentPatch, ShippingPatch, Step, StepForm, Submission, progress,
    validate_login,
};
use crate::error::{Result, add_breadcrumb, set_sentry_user};
use crate::models::{CartStore, ShopperState};
use crate::services::auth::AuthStore;
use crate::state::AppState;

const CHECKOUT_PATH: &str = "/checkout";

const US_STATES: &[&str] = &[
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

const COUNTRIES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("CA", "Canada"),
    ("UK", "United Kingdom"),
];

// =============================================================================
// View Types
// =============================================================================

/// A `<select>` option.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

fn options<'a>(choices: impl Iterator<Item = (&'a str, &'a str)>, current: &str) -> Vec<OptionView> {
    choices
        .map(|(value, label)| OptionView {
            value: value.to_owned(),
            label: label.to_owned(),
            selected: value == current,
        })
        .collect()
}

/// One entry of the progress indicator.
#[derive(Debug, Clone)]
pub struct ProgressView {
    pub number: u8,
    pub name: &'static str,
    pub status: &'static str,
    pub is_complete: bool,
    pub is_current: bool,
}

/// Confirmation page data, read from the placed order.
#[derive(Debug, Clone)]
pub struct ConfirmationView {
    pub order_number: String,
    pub placed_on: String,
    pub estimated_delivery: String,
    pub total: String,
    pub customer: Customer,
    pub shipping_address: Address,
}

impl From<&OrderConfirmation> for ConfirmationView {
    fn from(order: &OrderConfirmation) -> Self {
        Self {
            order_number: order.order_number.clone(),
            placed_on: order.placed_on_display(),
            estimated_delivery: order.estimated_delivery_display(),
            total: order.totals.total_display(),
            customer: order.customer.clone(),
            shipping_address: order.shipping_address.clone(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    /// Which form to render (`login`, `guest`, `shipping`, `payment`, `confirmation`).
    pub form: &'static str,
    pub show_progress: bool,
    pub progress: Vec<ProgressView>,
    pub data: CheckoutData,
    pub errors: FieldErrors,
    /// Email typed into the sign-in form.
    pub login_email: String,
    pub summary: CartView,
    pub confirmation: Option<ConfirmationView>,
    pub states: Vec<OptionView>,
    pub countries: Vec<OptionView>,
    pub billing_states: Vec<OptionView>,
    pub billing_countries: Vec<OptionView>,
    pub toasts: Vec<ToastView>,
    pub cart_count: u32,
}

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    pub password: Option<SecretString>,
}

/// Guest contact form data.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerForm {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl From<CustomerForm> for CustomerPatch {
    fn from(form: CustomerForm) -> Self {
        Self {
            email: form.email.map(|v| v.trim().to_owned()),
            first_name: form.first_name,
            last_name: form.last_name,
            phone: form.phone,
        }
    }
}

/// Shipping form data. Billing fields are only read when the
/// same-as-billing box is unchecked.
#[derive(Debug, Default, Deserialize)]
pub struct ShippingForm {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    /// Checkbox: present when checked.
    pub same_as_billing: Option<String>,
    pub billing_address1: Option<String>,
    pub billing_address2: Option<String>,
    pub billing_city: Option<String>,
    pub billing_state: Option<String>,
    pub billing_zip_code: Option<String>,
    pub billing_country: Option<String>,
}

impl ShippingForm {
    fn into_patches(self) -> (CustomerPatch, ShippingPatch, Option<AddressPatch>) {
        let billing = AddressPatch {
            address1: self.billing_address1,
            address2: self.billing_address2,
            city: self.billing_city,
            state: self.billing_state,
            zip_code: self.billing_zip_code,
            country: self.billing_country,
        };
        let shipping = ShippingPatch {
            address: AddressPatch {
                address1: self.address1,
                address2: self.address2,
                city: self.city,
                state: self.state,
                zip_code: self.zip_code,
                country: self.country,
            },
            same_as_billing: Some(self.same_as_billing.is_some()),
        };

        let customer = CustomerForm {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
        };

        let billing = (billing != AddressPatch::default()).then_some(billing);
        (customer.into(), shipping, billing)
    }
}

/// Payment form data.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentForm {
    pub card_number: Option<SecretString>,
    pub name_on_card: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<SecretString>,
    /// Checkbox: present when checked.
    pub save_card: Option<String>,
    pub order_notes: Option<String>,
}

impl PaymentForm {
    fn into_patch(self) -> (PaymentPatch, Option<String>) {
        let patch = PaymentPatch {
            card_number: self.card_number.map(|v| v.expose_secret().to_owned()),
            name_on_card: self.name_on_card,
            expiry_date: self.expiry_date,
            cvv: self.cvv.map(|v| v.expose_secret().to_owned()),
            save_card: Some(self.save_card.is_some()),
        };
        (patch, self.order_notes)
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Prepare the shopper's session for rendering the checkout.
///
/// Returns `false` when there is nothing to check out.
fn prepare(state: &AppState, shopper: &mut ShopperState) -> bool {
    if shopper.checkout.step() != Step::Confirmation && shopper.cart.is_empty() {
        if !state.config().demo_cart {
            return false;
        }
        for line in state.catalog().demo_cart_lines() {
            shopper.cart.add_item(line);
        }
        tracing::debug!("seeded demo cart");
    }

    shopper.checkout.sync_with_auth(&shopper.auth);
    true
}

fn render(
    state: &AppState,
    shopper: &mut ShopperState,
    errors: FieldErrors,
    login_email: String,
) -> CheckoutTemplate {
    let policy = &state.config().pricing;
    let checkout = &shopper.checkout;
    let data = checkout.data();
    let step = checkout.step();

    let form = checkout.current_form(shopper.auth.is_authenticated());

    let (summary, confirmation) = match checkout.confirmation() {
        Some(order) => (
            CartView::from_parts(Vec::new(), order.item_count, &order.totals, policy),
            Some(ConfirmationView::from(order)),
        ),
        None => (CartView::new(&shopper.cart, policy), None),
    };

    let progress = progress(step)
        .into_iter()
        .map(|entry| ProgressView {
            number: entry.number,
            name: entry.name,
            status: entry.status.as_str(),
            is_complete: entry.status == StepStatus::Complete,
            is_current: entry.status == StepStatus::Current,
        })
        .collect();

    let state_choices = || US_STATES.iter().map(|s| (*s, *s));

    CheckoutTemplate {
        form: form.as_str(),
        show_progress: form != StepForm::Confirmation,
        progress,
        states: options(state_choices(), &data.shipping.address.state),
        countries: options(COUNTRIES.iter().copied(), &data.shipping.address.country),
        billing_states: options(state_choices(), &data.billing.state),
        billing_countries: options(COUNTRIES.iter().copied(), &data.billing.country),
        data: data.clone(),
        errors,
        login_email,
        summary,
        confirmation,
        cart_count: shopper.cart.count(),
        toasts: ToastView::drain(&mut shopper.toasts),
    }
}

/// Re-render the current step with field errors.
async fn invalid(
    state: &AppState,
    session: &Session,
    mut shopper: ShopperState,
    errors: FieldErrors,
    login_email: String,
) -> Result<Response> {
    tracing::info!(
        step = shopper.checkout.step().as_str(),
        fields = ?errors.fields().collect::<Vec<_>>(),
        "checkout form rejected"
    );
    let page = render(state, &mut shopper, errors, login_email);
    shopper.save(session).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

/// Save and redirect, or re-render with errors.
async fn conclude(
    state: &AppState,
    session: &Session,
    shopper: ShopperState,
    outcome: Submission,
) -> Result<Response> {
    match outcome {
        Ok(_) => {
            shopper.save(session).await?;
            Ok(Redirect::to(CHECKOUT_PATH).into_response())
        }
        Err(errors) => invalid(state, session, shopper, errors, String::new()).await,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the current checkout step.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut shopper = ShopperState::load(&session).await?;

    if !prepare(&state, &mut shopper) {
        return Ok(Redirect::to("/cart").into_response());
    }

    let page = render(&state, &mut shopper, FieldErrors::new(), String::new());
    shopper.save(&session).await?;
    Ok(page.into_response())
}

/// Switch the sign-in step to the guest contact form.
#[instrument(skip(session))]
pub async fn guest(session: Session) -> Result<Response> {
    let mut shopper = ShopperState::load(&session).await?;
    shopper.checkout.continue_as_guest();
    shopper.save(&session).await?;
    Ok(Redirect::to(CHECKOUT_PATH).into_response())
}

/// Simulated sign-in.
#[instrument(skip(state, session))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let password = form
        .password
        .unwrap_or_else(|| SecretString::from(String::new()));

    if let Err(errors) = validate_login(&form.email, password.expose_secret()) {
        let shopper = ShopperState::load(&session).await?;
        return invalid(&state, &session, shopper, errors, form.email).await;
    }

    let result = state
        .auth()
        .login_with_password(form.email.trim(), &password)
        .await;

    // Load after the delay so concurrent requests during it are not lost.
    let mut shopper = ShopperState::load(&session).await?;
    match result {
        Ok(credentials) => {
            set_sentry_user(&credentials.user.id, Some(credentials.user.email.as_str()));
            shopper
                .checkout
                .complete_login(&mut shopper.auth, &mut shopper.toasts, credentials);
        }
        Err(e) => {
            tracing::warn!(error = %e, "sign-in failed");
            CheckoutSession::login_failed(&mut shopper.toasts);
        }
    }

    shopper.save(&session).await?;
    Ok(Redirect::to(CHECKOUT_PATH).into_response())
}

/// Guest contact form.
#[instrument(skip(state, session))]
pub async fn customer(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CustomerForm>,
) -> Result<Response> {
    let mut shopper = ShopperState::load(&session).await?;
    let outcome = shopper.checkout.submit_guest(form.into());
    conclude(&state, &session, shopper, outcome).await
}

/// Shipping form.
#[instrument(skip(state, session))]
pub async fn shipping(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ShippingForm>,
) -> Result<Response> {
    let (customer, shipping, billing) = form.into_patches();

    let mut shopper = ShopperState::load(&session).await?;
    let outcome = shopper
        .checkout
        .submit_shipping(customer, shipping, billing);
    conclude(&state, &session, shopper, outcome).await
}

/// Payment form. A valid submit places the order.
#[instrument(skip(state, session))]
pub async fn payment(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PaymentForm>,
) -> Result<Response> {
    let (patch, order_notes) = form.into_patch();

    let mut shopper = ShopperState::load(&session).await?;
    let ShopperState {
        cart,
        toasts,
        checkout,
        ..
    } = &mut shopper;

    let outcome = checkout.submit_payment(
        patch,
        order_notes,
        cart,
        toasts,
        &state.config().pricing,
        Utc::now(),
    );

    let placed = matches!(&outcome, Ok(Some(t)) if t.to == Step::Confirmation);
    if let Some(order) = shopper.checkout.confirmation().filter(|_| placed) {
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_number", order.order_number.as_str())]),
        );
    }

    conclude(&state, &session, shopper, outcome).await
}

/// Previous step.
#[instrument(skip(session))]
pub async fn back(session: Session) -> Result<Response> {
    let mut shopper = ShopperState::load(&session).await?;
    shopper.checkout.back();
    shopper.save(&session).await?;
    Ok(Redirect::to(CHECKOUT_PATH).into_response())
}

/// Discard the checkout and start over.
#[instrument(skip(session))]
pub async fn reset(session: Session) -> Result<Response> {
    let mut shopper = ShopperState::load(&session).await?;
    shopper.checkout.reset();
    shopper.save(&session).await?;
    Ok(Redirect::to(CHECKOUT_PATH).into_response())
}

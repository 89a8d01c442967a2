//! One shopper's checkout: step, guest flag, entered data and the placed order.
//!
//! Form submissions merge their data first and validate second, so a failed
//! submit still keeps what the shopper typed. Submissions that arrive for a
//! step other than the current one are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larkspur_core::Severity;

use super::data::{AddressPatch, CheckoutData, CustomerPatch, PaymentPatch, ShippingPatch};
use super::finalize::{OrderConfirmation, finalize};
use super::pricing::PricingPolicy;
use super::render::{StepForm, select_form};
use super::step::{Step, StepController, Transition};
use super::validation::{FieldErrors, validate_guest, validate_payment, validate_shipping};
use crate::models::CartStore;
use crate::notify::Notifier;
use crate::services::auth::{AuthStore, Credentials};

/// Toast for a resolved sign-in.
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

/// Toast for a rejected sign-in.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

/// Outcome of a form submission.
pub type Submission = Result<Option<Transition>, FieldErrors>;

/// Checkout state kept in the shopper's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    steps: StepController,
    is_guest: bool,
    data: CheckoutData,
    confirmation: Option<OrderConfirmation>,
}

impl CheckoutSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> Step {
        self.steps.step()
    }

    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.is_guest
    }

    #[must_use]
    pub const fn data(&self) -> &CheckoutData {
        &self.data
    }

    /// The placed order, once at CONFIRMATION.
    #[must_use]
    pub const fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// Form to render for the current step.
    #[must_use]
    pub const fn current_form(&self, is_authenticated: bool) -> StepForm {
        select_form(self.steps.step(), is_authenticated, self.is_guest)
    }

    /// Apply the authenticated-shopper skip. Call before every render.
    pub fn sync_with_auth<A>(&mut self, auth: &A) -> Option<Transition>
    where
        A: AuthStore + ?Sized,
    {
        self.steps
            .jump_to_shipping_if_authenticated(auth.is_authenticated())
    }

    /// Switch the AUTH step to the guest form. The step does not change.
    pub fn continue_as_guest(&mut self) {
        if self.steps.step() == Step::Auth {
            self.is_guest = true;
        }
    }

    /// Guest contact form at AUTH.
    ///
    /// # Errors
    ///
    /// Returns the failing fields; the step does not change.
    pub fn submit_guest(&mut self, customer: CustomerPatch) -> Submission {
        if !self.expect(Step::Auth) || !self.is_guest {
            return Ok(None);
        }

        self.data.update_customer(customer);
        validate_guest(&self.data.customer)?;
        Ok(self.steps.advance())
    }

    /// Store the credentials of a resolved sign-in and leave AUTH.
    pub fn complete_login<A, N>(
        &mut self,
        auth: &mut A,
        notifier: &mut N,
        credentials: Credentials,
    ) -> Option<Transition>
    where
        A: AuthStore + ?Sized,
        N: Notifier + ?Sized,
    {
        // Prefill contact email so the shipping form starts populated.
        if self.data.customer.email.is_empty() {
            self.data.update_customer(CustomerPatch {
                email: Some(credentials.user.email.to_string()),
                ..CustomerPatch::default()
            });
        }

        auth.set_credentials(credentials.user, credentials.token);
        notifier.notify(LOGIN_SUCCESS_MESSAGE, Severity::Success);

        if self.expect(Step::Auth) {
            self.steps.advance()
        } else {
            None
        }
    }

    /// Report a rejected sign-in. The shopper stays at AUTH.
    pub fn login_failed<N>(notifier: &mut N)
    where
        N: Notifier + ?Sized,
    {
        notifier.notify(LOGIN_FAILED_MESSAGE, Severity::Error);
    }

    /// Shipping form: contact details, shipping address and, when billing is
    /// not mirrored, the billing address.
    ///
    /// # Errors
    ///
    /// Returns the failing fields; the step does not change.
    pub fn submit_shipping(
        &mut self,
        customer: CustomerPatch,
        shipping: ShippingPatch,
        billing: Option<AddressPatch>,
    ) -> Submission {
        if !self.expect(Step::Shipping) {
            return Ok(None);
        }

        self.data.update_customer(customer);
        self.data.update_shipping(shipping);
        if let Some(billing) = billing.filter(|_| !self.data.shipping.same_as_billing) {
            self.data.update_billing(billing);
        }

        validate_shipping(&self.data.customer, &self.data.shipping)?;
        Ok(self.steps.advance())
    }

    /// Payment form. A valid submit places the order.
    ///
    /// # Errors
    ///
    /// Returns the failing fields; the cart is left untouched.
    pub fn submit_payment<C, N>(
        &mut self,
        payment: PaymentPatch,
        order_notes: Option<String>,
        cart: &mut C,
        notifier: &mut N,
        policy: &PricingPolicy,
        now: DateTime<Utc>,
    ) -> Submission
    where
        C: CartStore + ?Sized,
        N: Notifier + ?Sized,
    {
        if !self.expect(Step::Payment) {
            return Ok(None);
        }

        self.data.update_payment(payment);
        if let Some(notes) = order_notes {
            self.data.set_order_notes(notes);
        }

        validate_payment(&self.data.payment, now.date_naive())?;

        let (confirmation, transition) =
            finalize(cart, notifier, &mut self.steps, &self.data, policy, now);
        self.confirmation = Some(confirmation);
        Ok(Some(transition))
    }

    /// Previous step. Entered data is kept.
    pub fn back(&mut self) -> Option<Transition> {
        self.steps.retreat()
    }

    /// Start over with a fresh checkout.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn expect(&self, step: Step) -> bool {
        let current = self.steps.step();
        if current != step {
            tracing::debug!(
                expected = step.as_str(),
                current = current.as_str(),
                "submission for another step ignored"
            );
        }
        current == step
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use larkspur_core::{Email, ProductId, UserId, UserRole};

    use super::*;
    use crate::checkout::finalize::ORDER_PLACED_MESSAGE;
    use crate::models::{AuthState, Cart, CartItem, User};
    use crate::notify::ToastQueue;
    use crate::services::auth::MOCK_TOKEN;

    fn some(s: &str) -> Option<String> {
        Some(s.to_owned())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(CartItem {
            product_id: ProductId::new(4),
            name: "Statement Earrings".to_owned(),
            price: dec!(29.99),
            sale_price: None,
            image: String::new(),
            variant_color: "default".to_owned(),
            variant_size: "OS".to_owned(),
            quantity: 1,
        });
        cart
    }

    fn guest_contact() -> CustomerPatch {
        CustomerPatch {
            email: some("jane@example.com"),
            first_name: some("Jane"),
            last_name: some("Doe"),
            phone: some("512-555-0100"),
        }
    }

    fn shipping_address() -> ShippingPatch {
        ShippingPatch {
            address: AddressPatch {
                address1: some("12 Garden Row"),
                city: some("Austin"),
                state: some("Texas"),
                zip_code: some("78701"),
                ..AddressPatch::default()
            },
            same_as_billing: Some(true),
        }
    }

    fn valid_card() -> PaymentPatch {
        PaymentPatch {
            card_number: some("4111111111111111"),
            name_on_card: some("Jane Doe"),
            expiry_date: some("1230"),
            cvv: some("123"),
            save_card: Some(false),
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            user: User {
                id: UserId::new(1),
                email: Email::parse("jane@example.com").unwrap(),
                name: "John Doe".to_owned(),
                role: UserRole::User,
            },
            token: MOCK_TOKEN.to_owned(),
        }
    }

    #[test]
    fn test_guest_flow_reaches_confirmation() {
        let mut session = CheckoutSession::new();
        let mut cart = cart();
        let mut toasts = ToastQueue::new();

        assert_eq!(session.current_form(false), StepForm::Login);
        session.continue_as_guest();
        assert_eq!(session.step(), Step::Auth);
        assert_eq!(session.current_form(false), StepForm::Guest);

        session.submit_guest(guest_contact()).unwrap();
        assert_eq!(session.step(), Step::Shipping);

        session
            .submit_shipping(CustomerPatch::default(), shipping_address(), None)
            .unwrap();
        assert_eq!(session.step(), Step::Payment);
        assert_eq!(session.data().billing.city, "Austin");

        session
            .submit_payment(
                valid_card(),
                some("ring twice"),
                &mut cart,
                &mut toasts,
                &PricingPolicy::default(),
                now(),
            )
            .unwrap();

        assert_eq!(session.step(), Step::Confirmation);
        assert!(cart.is_empty());
        assert_eq!(session.data().order_notes, "ring twice");

        let confirmation = session.confirmation().unwrap();
        assert_eq!(confirmation.totals.subtotal, dec!(29.99));
        assert_eq!(confirmation.totals.shipping, dec!(5.99));
        assert!(confirmation.order_number.starts_with("ORD-"));
        assert_eq!(
            toasts.pending().first().map(|t| t.message.as_str()),
            Some(ORDER_PLACED_MESSAGE)
        );
    }

    #[test]
    fn test_invalid_submit_keeps_data_and_step() {
        let mut session = CheckoutSession::new();
        session.continue_as_guest();

        let errors = session
            .submit_guest(CustomerPatch {
                email: some("jane@example.com"),
                ..CustomerPatch::default()
            })
            .unwrap_err();

        assert!(errors.has("first_name"));
        assert_eq!(session.step(), Step::Auth);
        assert_eq!(session.data().customer.email, "jane@example.com");
    }

    #[test]
    fn test_invalid_payment_leaves_cart() {
        let mut session = CheckoutSession::new();
        session.continue_as_guest();
        session.submit_guest(guest_contact()).unwrap();
        session
            .submit_shipping(CustomerPatch::default(), shipping_address(), None)
            .unwrap();

        let mut cart = cart();
        let mut toasts = ToastQueue::new();
        let result = session.submit_payment(
            PaymentPatch {
                expiry_date: some("0120"),
                ..valid_card()
            },
            None,
            &mut cart,
            &mut toasts,
            &PricingPolicy::default(),
            now(),
        );

        assert_eq!(
            result.unwrap_err().get("expiry_date"),
            Some("Card is expired")
        );
        assert_eq!(session.step(), Step::Payment);
        assert!(!cart.is_empty());
        assert!(toasts.is_empty());
        assert!(session.confirmation().is_none());
    }

    #[test]
    fn test_login_advances_and_prefills_email() {
        let mut session = CheckoutSession::new();
        let mut auth = AuthState::default();
        let mut toasts = ToastQueue::new();

        let transition = session.complete_login(&mut auth, &mut toasts, credentials());

        assert_eq!(transition.map(|t| t.to), Some(Step::Shipping));
        assert!(auth.is_authenticated());
        assert_eq!(session.data().customer.email, "jane@example.com");
        assert_eq!(
            toasts.pending().first().map(|t| t.message.as_str()),
            Some(LOGIN_SUCCESS_MESSAGE)
        );
    }

    #[test]
    fn test_login_failure_stays_at_auth() {
        let session = CheckoutSession::new();
        let mut toasts = ToastQueue::new();
        CheckoutSession::login_failed(&mut toasts);

        assert_eq!(session.step(), Step::Auth);
        let toast = toasts.pending().first().unwrap();
        assert_eq!(toast.message, LOGIN_FAILED_MESSAGE);
        assert_eq!(toast.severity, Severity::Error);
    }

    #[test]
    fn test_authenticated_shopper_skips_auth() {
        let mut session = CheckoutSession::new();
        let mut auth = AuthState::default();
        auth.set_credentials(credentials().user, MOCK_TOKEN.to_owned());

        assert!(session.sync_with_auth(&auth).is_some());
        assert_eq!(session.step(), Step::Shipping);

        session.back();
        assert_eq!(session.step(), Step::Auth);
        session.sync_with_auth(&auth);
        assert_eq!(session.step(), Step::Shipping);
    }

    #[test]
    fn test_back_keeps_entered_data() {
        let mut session = CheckoutSession::new();
        session.continue_as_guest();
        session.submit_guest(guest_contact()).unwrap();
        session
            .submit_shipping(CustomerPatch::default(), shipping_address(), None)
            .unwrap();

        session.back();
        session.back();
        assert_eq!(session.step(), Step::Auth);
        assert_eq!(session.current_form(false), StepForm::Guest);
        assert_eq!(session.data().shipping.address.address1, "12 Garden Row");
        assert_eq!(session.data().customer.first_name, "Jane");
    }

    #[test]
    fn test_out_of_step_submission_is_ignored() {
        let mut session = CheckoutSession::new();
        let result = session.submit_shipping(guest_contact(), shipping_address(), None);

        assert_eq!(result, Ok(None));
        assert_eq!(session.step(), Step::Auth);
        assert!(session.data().customer.email.is_empty());
    }

    #[test]
    fn test_billing_fields_apply_only_when_not_mirrored() {
        let mut session = CheckoutSession::new();
        session.continue_as_guest();
        session.submit_guest(guest_contact()).unwrap();

        let billing = AddressPatch {
            address1: some("1 Billing Way"),
            ..AddressPatch::default()
        };
        session
            .submit_shipping(
                CustomerPatch::default(),
                ShippingPatch {
                    same_as_billing: Some(false),
                    ..shipping_address()
                },
                Some(billing),
            )
            .unwrap();

        assert_eq!(session.data().billing.address1, "1 Billing Way");
        assert_eq!(session.data().shipping.address.address1, "12 Garden Row");
    }

    #[test]
    fn test_confirmation_is_terminal() {
        let mut session = CheckoutSession::new();
        session.continue_as_guest();
        session.submit_guest(guest_contact()).unwrap();
        session
            .submit_shipping(CustomerPatch::default(), shipping_address(), None)
            .unwrap();
        session
            .submit_payment(
                valid_card(),
                None,
                &mut cart(),
                &mut ToastQueue::new(),
                &PricingPolicy::default(),
                now(),
            )
            .unwrap();

        assert_eq!(session.back(), None);
        assert_eq!(session.step(), Step::Confirmation);

        session.reset();
        assert_eq!(session, CheckoutSession::new());
    }
}

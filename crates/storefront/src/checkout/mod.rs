//! Checkout: a linear step machine over the shopper's cart.
//!
//! AUTH → SHIPPING → PAYMENT → CONFIRMATION. Everything here is synchronous
//! and free of I/O; the HTTP layer loads a [`CheckoutSession`] from the
//! session store, applies one operation and writes it back.

mod data;
mod finalize;
mod flow;
mod payment;
mod pricing;
mod render;
mod step;
mod validation;

pub use data::{
    Address, AddressPatch, CheckoutData, Customer, CustomerPatch, Payment, PaymentPatch,
    Shipping, ShippingPatch,
};
pub use finalize::{ORDER_PLACED_MESSAGE, OrderConfirmation, finalize, order_number};
pub use flow::{CheckoutSession, LOGIN_FAILED_MESSAGE, LOGIN_SUCCESS_MESSAGE, Submission};
pub use payment::{card_digit_count, format_card_number, format_expiry_date};
pub use pricing::{OrderTotals, PricingPolicy};
pub use render::{StepForm, select_form};
pub use step::{ProgressEntry, Step, StepController, Transition, progress};
pub use validation::{
    FieldErrors, is_expired, validate_guest, validate_login, validate_payment, validate_shipping,
};

//! Order placement.
//!
//! There is no payment gateway. Placing an order snapshots the totals, empties
//! the cart, queues a success toast and moves the checkout to CONFIRMATION.

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

use larkspur_core::Severity;

use super::data::{Address, CheckoutData, Customer};
use super::pricing::{OrderTotals, PricingPolicy};
use super::step::{StepController, Transition};
use crate::models::CartStore;
use crate::notify::Notifier;

/// Toast shown once the order is placed.
pub const ORDER_PLACED_MESSAGE: &str = "Your order has been placed successfully!";

/// Days between placing an order and its estimated delivery.
const DELIVERY_DAYS: u64 = 7;

/// Characters dropped from the front of the millisecond timestamp.
const ORDER_NUMBER_SKIP: usize = 5;

/// Order number for an order placed at `now`.
///
/// `ORD-` followed by the Unix millisecond timestamp with its first five
/// digits removed.
#[must_use]
pub fn order_number(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().to_string();
    format!("ORD-{}", millis.get(ORDER_NUMBER_SKIP..).unwrap_or_default())
}

/// What the confirmation page shows. Captured before the cart is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
    pub totals: OrderTotals,
    pub item_count: u32,
    pub customer: Customer,
    pub shipping_address: Address,
}

impl OrderConfirmation {
    /// e.g. `Oct 18, 2026`
    #[must_use]
    pub fn placed_on_display(&self) -> String {
        self.placed_at.format("%b %-d, %Y").to_string()
    }

    #[must_use]
    pub fn estimated_delivery_display(&self) -> String {
        self.estimated_delivery.format("%b %-d, %Y").to_string()
    }
}

/// Place the order.
///
/// Runs as one synchronous update: the caller saves the session afterwards,
/// so no intermediate state is observable.
pub fn finalize<C, N>(
    cart: &mut C,
    notifier: &mut N,
    steps: &mut StepController,
    data: &CheckoutData,
    policy: &PricingPolicy,
    now: DateTime<Utc>,
) -> (OrderConfirmation, Transition)
where
    C: CartStore + ?Sized,
    N: Notifier + ?Sized,
{
    let totals = policy.totals(cart.total());
    let item_count = cart.count();

    let confirmation = OrderConfirmation {
        order_number: order_number(now),
        placed_at: now,
        estimated_delivery: now
            .checked_add_days(Days::new(DELIVERY_DAYS))
            .unwrap_or(now),
        totals,
        item_count,
        customer: data.customer.clone(),
        shipping_address: data.shipping.address.clone(),
    };

    cart.clear();
    notifier.notify(ORDER_PLACED_MESSAGE, Severity::Success);
    let transition = steps.complete();

    tracing::info!(
        order_number = %confirmation.order_number,
        total = %confirmation.totals.total,
        items = item_count,
        "order placed"
    );

    (confirmation, transition)
}

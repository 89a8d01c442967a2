//! The checkout aggregate and its section-scoped updates.
//!
//! Updates are shallow merges: a patch sets only the fields it carries and
//! only within its own section. No update path replaces the whole aggregate.

use serde::{Deserialize, Serialize};

use super::payment::{format_card_number, format_expiry_date};

const DEFAULT_COUNTRY: &str = "US";

/// Contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl Customer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// A postal address. Shipping and billing share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address1: String,
    /// Optional second line; empty when absent.
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            address1: String::new(),
            address2: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_owned(),
        }
    }
}

impl Address {
    /// The second line, if one was entered.
    #[must_use]
    pub fn address2(&self) -> Option<&str> {
        let line = self.address2.trim();
        (!line.is_empty()).then_some(line)
    }

    fn merge(&mut self, patch: AddressPatch) {
        merge_field(&mut self.address1, patch.address1);
        merge_field(&mut self.address2, patch.address2);
        merge_field(&mut self.city, patch.city);
        merge_field(&mut self.state, patch.state);
        merge_field(&mut self.zip_code, patch.zip_code);
        merge_field(&mut self.country, patch.country);
    }
}

/// Shipping address plus the billing-mirror flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipping {
    pub address: Address,
    pub same_as_billing: bool,
}

impl Default for Shipping {
    fn default() -> Self {
        Self {
            address: Address::default(),
            same_as_billing: true,
        }
    }
}

/// Card details as entered, already formatted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// `#### #### #### ####`
    pub card_number: String,
    pub name_on_card: String,
    /// `MM/YY`
    pub expiry_date: String,
    pub cvv: String,
    pub save_card: bool,
}

/// Everything the shopper enters during one checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutData {
    pub customer: Customer,
    pub shipping: Shipping,
    pub billing: Address,
    pub payment: Payment,
    pub order_notes: String,
}

// =============================================================================
// Patches
// =============================================================================

/// Partial update for [`Customer`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Partial update for an [`Address`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressPatch {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Partial update for [`Shipping`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingPatch {
    pub address: AddressPatch,
    pub same_as_billing: Option<bool>,
}

/// Partial update for [`Payment`]. Card number and expiry are formatted on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentPatch {
    pub card_number: Option<String>,
    pub name_on_card: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
    pub save_card: Option<bool>,
}

fn merge_field<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

// =============================================================================
// Aggregator
// =============================================================================

impl CheckoutData {
    /// A fresh aggregate: empty strings, country `US`, billing mirrored.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge into the `customer` section only.
    pub fn update_customer(&mut self, patch: CustomerPatch) {
        merge_field(&mut self.customer.email, patch.email);
        merge_field(&mut self.customer.first_name, patch.first_name);
        merge_field(&mut self.customer.last_name, patch.last_name);
        merge_field(&mut self.customer.phone, patch.phone);
    }

    /// Merge into the `shipping` section.
    ///
    /// While `same_as_billing` is set, a change to any shipping address field
    /// copies the whole shipping address into billing. Turning the flag on
    /// does not copy by itself; the next address change does.
    pub fn update_shipping(&mut self, patch: ShippingPatch) {
        let before = self.shipping.address.clone();

        self.shipping.address.merge(patch.address);
        merge_field(&mut self.shipping.same_as_billing, patch.same_as_billing);

        if self.shipping.same_as_billing && self.shipping.address != before {
            self.billing = self.shipping.address.clone();
        }
    }

    /// Merge into the `billing` section only.
    pub fn update_billing(&mut self, patch: AddressPatch) {
        self.billing.merge(patch);
    }

    /// Merge into the `payment` section only, formatting card number and expiry.
    pub fn update_payment(&mut self, patch: PaymentPatch) {
        merge_field(
            &mut self.payment.card_number,
            patch.card_number.as_deref().map(format_card_number),
        );
        merge_field(&mut self.payment.name_on_card, patch.name_on_card);
        merge_field(
            &mut self.payment.expiry_date,
            patch.expiry_date.as_deref().map(format_expiry_date),
        );
        merge_field(&mut self.payment.cvv, patch.cvv);
        merge_field(&mut self.payment.save_card, patch.save_card);
    }

    pub fn set_order_notes(&mut self, notes: impl Into<String>) {
        self.order_notes = notes.into();
    }
}

//! Order totals.
//!
//! Amounts stay unrounded until display; [`Price::display`] rounds to cents.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use larkspur_core::Price;

/// Shipping and tax rules applied to a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Decimal,
    pub flat_shipping: Decimal,
    /// Fraction of the subtotal, e.g. `0.0825`.
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: dec!(75),
            flat_shipping: dec!(5.99),
            tax_rate: dec!(0.0825),
        }
    }
}

impl PricingPolicy {
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping
        }
    }

    #[must_use]
    pub fn tax_for(&self, subtotal: Decimal) -> Decimal {
        subtotal * self.tax_rate
    }

    /// Totals for a cart subtotal.
    #[must_use]
    pub fn totals(&self, subtotal: Decimal) -> OrderTotals {
        let shipping = self.shipping_for(subtotal);
        let tax = self.tax_for(subtotal);
        OrderTotals {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// Subtotal, shipping, tax and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    #[must_use]
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    #[must_use]
    pub fn subtotal_display(&self) -> String {
        Price::usd(self.subtotal).display()
    }

    /// `"Free"` when shipping costs nothing.
    #[must_use]
    pub fn shipping_display(&self) -> String {
        if self.is_free_shipping() {
            "Free".to_owned()
        } else {
            Price::usd(self.shipping).display()
        }
    }

    #[must_use]
    pub fn tax_display(&self) -> String {
        Price::usd(self.tax).display()
    }

    #[must_use]
    pub fn total_display(&self) -> String {
        Price::usd(self.total).display()
    }
}

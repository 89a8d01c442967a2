//! Session cart.
//!
//! A cart line is identified by product plus variant (color and size). Adding
//! a line that already exists increases its quantity instead of duplicating it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use larkspur_core::ProductId;

/// Most units of one line the cart will hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// The cart operations the checkout depends on.
pub trait CartStore {
    /// Lines currently in the cart.
    fn items(&self) -> &[CartItem];

    /// Sum of effective unit price times quantity, unrounded.
    fn total(&self) -> Decimal;

    /// Add a line, merging with an existing line of the same variant.
    fn add_item(&mut self, item: CartItem);

    /// Remove every line.
    fn clear(&mut self);

    /// Total number of units across all lines.
    fn count(&self) -> u32 {
        self.items()
            .iter()
            .fold(0, |sum: u32, item| sum.saturating_add(item.quantity))
    }
}

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub variant_color: String,
    pub variant_size: String,
}

/// A product variant in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub image: String,
    /// Hex color, or `"default"` for products without color options.
    pub variant_color: String,
    pub variant_size: String,
    pub quantity: u32,
}

impl CartItem {
    /// Sale price when present, list price otherwise.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id,
            variant_color: self.variant_color.clone(),
            variant_size: self.variant_size.clone(),
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id
            && self.variant_color == key.variant_color
            && self.variant_size == key.variant_size
    }
}

/// Cart held in the visitor's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Set a line's quantity, capped at [`MAX_LINE_QUANTITY`]. A quantity of
    /// zero removes the line.
    ///
    /// Returns `false` if no line matches `key`.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(key);
        }

        match self.items.iter_mut().find(|item| item.matches(key)) {
            Some(item) => {
                item.quantity = quantity.min(MAX_LINE_QUANTITY);
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` if no line matches `key`.
    pub fn remove_item(&mut self, key: &LineKey) -> bool {
        let before = self.items.len();
        self.items.retain(|item| !item.matches(key));
        self.items.len() != before
    }
}

impl CartStore for Cart {
    fn items(&self) -> &[CartItem] {
        &self.items
    }

    fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    fn add_item(&mut self, mut item: CartItem) {
        let key = item.key();
        match self.items.iter_mut().find(|existing| existing.matches(&key)) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .saturating_add(item.quantity)
                    .min(MAX_LINE_QUANTITY);
            }
            None => {
                item.quantity = item.quantity.min(MAX_LINE_QUANTITY);
                self.items.push(item);
            }
        }
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

//! Static product catalog.
//!
//! Products are fixed at startup. Cart additions are resolved against this
//! table so prices always come from the server, never from the form.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use larkspur_core::ProductId;

use crate::models::CartItem;

/// Color used for products without color options.
pub const DEFAULT_COLOR: &str = "default";

/// Size used for one-size products.
pub const ONE_SIZE: &str = "OS";

const APPAREL_SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];
const ONE_SIZE_ONLY: &[&str] = &[ONE_SIZE];

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: &'static str,
    pub slug: &'static str,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub colors: &'static [&'static str],
    pub sizes: &'static [&'static str],
}

impl Product {
    /// Image path under `/static`.
    #[must_use]
    pub fn image(&self) -> String {
        format!("/static/images/{}.jpg", self.slug)
    }

    /// Resolve a requested variant. Products without colors only accept
    /// [`DEFAULT_COLOR`]; an empty request picks the first option.
    #[must_use]
    pub fn variant(&self, color: &str, size: &str) -> Option<(String, String)> {
        let color = if self.colors.is_empty() {
            (color.is_empty() || color == DEFAULT_COLOR).then_some(DEFAULT_COLOR)?
        } else if color.is_empty() {
            self.colors.first().copied()?
        } else {
            self.colors.iter().copied().find(|c| c.eq_ignore_ascii_case(color))?
        };

        let size = if size.is_empty() {
            self.sizes.first().copied()?
        } else {
            self.sizes.iter().copied().find(|s| *s == size)?
        };

        Some((color.to_owned(), size.to_owned()))
    }

    /// A cart line for this product.
    #[must_use]
    pub fn cart_item(&self, color: String, size: String, quantity: u32) -> CartItem {
        CartItem {
            product_id: self.id,
            name: self.name.to_owned(),
            price: self.price,
            sale_price: self.sale_price,
            image: self.image(),
            variant_color: color,
            variant_size: size,
            quantity,
        }
    }
}

/// In-memory product table.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::too_many_lines)]
fn seed() -> Vec<Product> {
    fn product(
        id: i32,
        name: &'static str,
        slug: &'static str,
        price: Decimal,
        sale_price: Option<Decimal>,
        colors: &'static [&'static str],
        categories: &[&str],
    ) -> Product {
        let sizes = if categories.contains(&"accessories") {
            ONE_SIZE_ONLY
        } else {
            APPAREL_SIZES
        };
        Product {
            id: ProductId::new(id),
            name,
            slug,
            price,
            sale_price,
            colors,
            sizes,
        }
    }

    vec![
        product(
            1,
            "Floral Summer Dress",
            "floral-summer-dress",
            dec!(79.99),
            None,
            &["#FADBC0", "#B3E5FC", "#F8BBD0"],
            &["dresses", "new-arrivals", "summer-collection"],
        ),
        product(
            2,
            "Casual Linen Blouse",
            "casual-linen-blouse",
            dec!(49.99),
            None,
            &["#FFFFFF", "#F5F5DC", "#000000"],
            &["tops"],
        ),
        product(
            3,
            "Bohemian Maxi Dress",
            "bohemian-maxi-dress",
            dec!(89.99),
            None,
            &["#D1C4E9", "#FFD8B2"],
            &["dresses"],
        ),
        product(
            4,
            "Statement Earrings",
            "statement-earrings",
            dec!(29.99),
            None,
            &[],
            &["accessories"],
        ),
        product(
            5,
            "Summer Straw Hat",
            "summer-straw-hat",
            dec!(34.99),
            Some(dec!(24.99)),
            &[],
            &["accessories", "sale"],
        ),
        product(
            6,
            "Designer Handbag",
            "designer-handbag",
            dec!(129.99),
            None,
            &[],
            &["accessories", "new-arrivals"],
        ),
        product(
            7,
            "Silk Scarf",
            "silk-scarf",
            dec!(45.99),
            Some(dec!(39.99)),
            &[],
            &["accessories", "sale"],
        ),
        product(
            8,
            "Elegant Jumpsuit",
            "elegant-jumpsuit",
            dec!(99.99),
            None,
            &[],
            &["dresses", "new-arrivals"],
        ),
        product(
            9,
            "Cotton T-Shirt",
            "cotton-t-shirt",
            dec!(29.99),
            None,
            &["#FFFFFF", "#000000", "#C9A9A6"],
            &["tops"],
        ),
        product(
            10,
            "Denim Jeans",
            "denim-jeans",
            dec!(69.99),
            Some(dec!(49.99)),
            &[],
            &["bottoms", "sale"],
        ),
        product(
            11,
            "Pearl Necklace",
            "pearl-necklace",
            dec!(59.99),
            None,
            &[],
            &["accessories"],
        ),
        product(
            12,
            "Summer Shorts",
            "summer-shorts",
            dec!(39.99),
            None,
            &[],
            &["bottoms", "summer-collection"],
        ),
    ]
}

impl Catalog {
    /// The built-in product table.
    #[must_use]
    pub fn new() -> Self {
        Self { products: seed() }
    }

    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Lines seeded into an empty cart when the demo cart is enabled.
    #[must_use]
    pub fn demo_cart_lines(&self) -> Vec<CartItem> {
        [(1, "#FADBC0", "M"), (4, DEFAULT_COLOR, ONE_SIZE)]
            .into_iter()
            .filter_map(|(id, color, size)| {
                self.find_by_id(ProductId::new(id))
                    .map(|p| p.cart_item(color.to_owned(), size.to_owned(), 1))
            })
            .collect()
    }
}

/// A shopping cart owned by the cart actor.
///
/// # Actor Framework
/// This struct implements [`ActorEntity`](resource_actor::ActorEntity) in
/// [`crate::cart_actor`]; lines change only through
/// [`CartAction`](crate::cart_actor::CartAction)s.
///
/// Once checkout begins the cart is locked: lines can be removed but not added
/// or resized until checkout ends or the cart is cleared.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Catalogue identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type-safe identifier for carts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartId(pub u32);

impl From<u32> for CartId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cart_{}", self.0)
    }
}

/// One product in one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub size: String,
    pub quantity: u32,
    /// Discounted price of a single unit, in major currency units.
    pub unit_price: Decimal,
}

impl CartLine {
    pub fn new(
        product_id: impl Into<ProductId>,
        title: impl Into<String>,
        size: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            size: size.into(),
            quantity,
            unit_price,
        }
    }

    /// `unit_price × quantity`, or `None` if it does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    /// Whether this line is for the given product and size.
    pub fn is_for(&self, product_id: &ProductId, size: &str) -> bool {
        self.product_id == *product_id && self.size == size
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub id: CartId,
    pub lines: Vec<CartLine>,
    pub checkout_locked: bool,
}

impl Cart {
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            checkout_locked: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// Payload for creating a cart, optionally pre-filled (e.g. restored from a previous visit).
#[derive(Debug, Clone, Default)]
pub struct CartCreate {
    pub lines: Vec<CartLine>,
}

//! Custom actions for the Cart actor.
//!
//! Every change to a cart's lines goes through one of these, so the cart actor
//! can publish a [`ResourceEvent`](resource_actor::ResourceEvent) after each
//! mutation and enforce the checkout lock in one place.

use crate::model::{CartLine, ProductId};

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds a line, merging with an existing line for the same product and size.
    AddLine(CartLine),
    /// Sets a line's quantity. Zero removes the line.
    SetQuantity {
        product_id: ProductId,
        size: String,
        quantity: u32,
    },
    RemoveLine { product_id: ProductId, size: String },
    /// Empties the cart and lifts the checkout lock.
    Clear,
    /// Locks the cart against additions for the duration of a checkout.
    BeginCheckout,
    EndCheckout,
}

/// Results from CartActions: the cart as it stands after the action.
#[derive(Debug, Clone)]
pub enum CartActionResult {
    Lines(Vec<CartLine>),
    Cleared,
    Locked(Vec<CartLine>),
    Unlocked,
}

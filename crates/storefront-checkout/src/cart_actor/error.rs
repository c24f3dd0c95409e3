//! Error types for the Cart actor.

use crate::model::ProductId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(String),

    /// Lines cannot be added or resized while checkout is in progress.
    #[error("Cart is locked for checkout")]
    Locked,

    #[error("Invalid quantity for {product_id}: {quantity}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    #[error("No line for {product_id} in size {size}")]
    LineNotFound { product_id: ProductId, size: String },

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

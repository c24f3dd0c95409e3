//! Error types for the Order actor.

use crate::model::{OrderStatus, Pincode, ProductId, ValidationError};
use crate::pricing::PricingError;
use crate::services::ServiceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Order has no items")]
    EmptyOrder,

    #[error("Invalid quantity for {0}")]
    InvalidQuantity(ProductId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Delivery not available for pincode {0}")]
    NotServiceable(Pincode),

    #[error("COD not available for this pincode")]
    PayOnDeliveryUnavailable,

    /// A collaborator needed to price the order failed.
    #[error("Order could not be priced: {0}")]
    Pricing(String),

    #[error("Order total changed from {expected} to {priced}. Please review your order")]
    TotalMismatch { expected: Decimal, priced: Decimal },

    #[error("Invalid payment signature")]
    InvalidSignature,

    #[error("Payment is for gateway order {received}, expected {expected}")]
    GatewayOrderMismatch { expected: String, received: String },

    #[error("Order is not paid through the gateway")]
    NotGatewayOrder,

    #[error("Order is already paid")]
    AlreadyPaid,

    #[error("Cannot move order from {from:?} to {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<PricingError> for OrderError {
    fn from(e: PricingError) -> Self {
        OrderError::Pricing(e.to_string())
    }
}

impl From<OrderError> for ServiceError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::ActorCommunicationError(_) => ServiceError::Unavailable,
            OrderError::NotServiceable(pincode) => ServiceError::NotServiceable(pincode),
            OrderError::InvalidSignature | OrderError::GatewayOrderMismatch { .. } => {
                ServiceError::VerificationFailed {
                    message: e.to_string(),
                }
            }
            other => ServiceError::rejected(other.to_string()),
        }
    }
}

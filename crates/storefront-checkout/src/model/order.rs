/// A persisted customer order.
///
/// # Actor Framework
/// This struct implements [`ActorEntity`](resource_actor::ActorEntity) in
/// [`crate::order_actor`], which validates delivery, computes totals and
/// verifies gateway payments.
///
/// See [`OrderRequest`] for the creation payload.
use crate::model::{CartLine, DeliveryAddress, PaymentMethod, Pincode};
use crate::pricing::OrderTotals;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub lines: Vec<CartLine>,
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub delivery_address: DeliveryAddress,
    pub pincode: Pincode,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    /// Grand total shown to the customer at checkout.
    pub quoted_total: Option<Decimal>,
}

impl Order {
    /// Whether the customer's payment has been settled (or will be, on delivery).
    pub fn is_confirmed(&self) -> bool {
        self.order_status == OrderStatus::Confirmed
    }
}

/// Payload for creating an order: a snapshot of the cart plus delivery details.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub lines: Vec<CartLine>,
    pub payment_method: PaymentMethod,
    pub delivery_address: DeliveryAddress,
    pub pincode: Pincode,
    /// The gateway charge this order will be paid through, if already registered.
    pub gateway_order_id: Option<String>,
    /// Grand total the customer was shown. The order is refused if the store
    /// prices it differently.
    pub expected_total: Option<Decimal>,
}

/// Fulfilment update applied by store staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub order_status: OrderStatus,
}

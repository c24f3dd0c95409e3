//! Payment gateway data exchanged during the gateway path.

use serde::{Deserialize, Serialize};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Online payment through the gateway's confirmation UI.
    #[default]
    Gateway,
    /// Cash on delivery. Only allowed where the delivery quote says so.
    PayOnDelivery,
}

/// A pending charge registered with the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayHandle {
    /// Opaque gateway order id.
    pub gateway_order_id: String,
    /// Amount in the currency's minor unit (paise for INR).
    pub amount_minor: u64,
    pub currency: String,
}

/// The signed transaction identifiers the gateway hands back on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayReceipt {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    /// Hex-encoded signature over the order and payment ids.
    pub signature: String,
}

/// How the gateway confirmation UI was left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// The customer paid; the receipt still has to be verified.
    Paid(GatewayReceipt),
    /// The customer closed the UI without paying.
    Dismissed,
    /// The gateway reported an error.
    Failed(String),
}

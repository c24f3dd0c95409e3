//! Custom actions for the Order actor.

use crate::model::GatewayReceipt;

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Records the gateway charge the order will be paid through.
    AttachGatewayOrder(String),
    /// Checks the receipt's signature and confirms the order.
    VerifyPayment(GatewayReceipt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderActionResult {
    GatewayOrderAttached,
    PaymentVerified,
}

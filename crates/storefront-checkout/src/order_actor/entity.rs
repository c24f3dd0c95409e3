//! ActorEntity implementation for [`Order`].
//!
//! Orders are priced and validated here rather than trusted from the caller:
//! `on_create` re-checks delivery for the pincode, recomputes the totals from
//! the line snapshot and decides the initial status from the payment method.

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use super::OrderContext;
use crate::model::{
    GatewayReceipt, Order, OrderId, OrderRequest, OrderStatus, OrderUpdate, PaymentMethod,
    PaymentStatus,
};
use crate::pricing::OrderTotals;
use crate::services::ServiceError;
use async_trait::async_trait;
use resource_actor::ActorEntity;
use tracing::{debug, info, warn};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderRequest;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderRequest) -> Result<Self, OrderError> {
        if params.lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if let Some(line) = params.lines.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::InvalidQuantity(line.product_id.clone()));
        }
        params.delivery_address.validate()?;

        Ok(Self {
            id,
            lines: params.lines,
            totals: OrderTotals::default(),
            payment_method: params.payment_method,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            delivery_address: params.delivery_address,
            pincode: params.pincode,
            gateway_order_id: params.gateway_order_id,
            gateway_payment_id: None,
            quoted_total: params.expected_total,
        })
    }

    /// Checks delivery and prices the order.
    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        let quote = ctx.pincodes.lookup(&self.pincode).await.map_err(|e| match e {
            ServiceError::NotServiceable(pincode) => OrderError::NotServiceable(pincode),
            other => OrderError::Pricing(other.to_string()),
        })?;

        if self.payment_method == PaymentMethod::PayOnDelivery && !quote.cod_available {
            return Err(OrderError::PayOnDeliveryUnavailable);
        }

        let rate = ctx
            .tax_rates
            .tax_rate_percent()
            .await
            .map_err(|e| OrderError::Pricing(e.to_string()))?;
        self.totals = OrderTotals::compute(&self.lines, rate, Some(&quote), &ctx.policy)?;
        if let Some(expected) = self.quoted_total {
            if expected != self.totals.grand_total {
                warn!(order_id = %self.id, %expected, priced = %self.totals.grand_total, "Order total mismatch");
                return Err(OrderError::TotalMismatch {
                    expected,
                    priced: self.totals.grand_total,
                });
            }
        }

        if self.payment_method == PaymentMethod::PayOnDelivery {
            self.order_status = OrderStatus::Confirmed;
        }
        debug!(order_id = %self.id, grand_total = %self.totals.grand_total, "Order priced");
        Ok(())
    }

    /// Applies a fulfilment status change.
    ///
    /// Confirmation only happens through payment (or at creation for
    /// pay-on-delivery); cancelled and delivered orders are final.
    async fn on_update(&mut self, update: OrderUpdate, _ctx: &OrderContext) -> Result<(), OrderError> {
        use OrderStatus::*;

        let from = self.order_status;
        let to = update.order_status;
        match (from, to) {
            _ if from == to => {}
            (Pending | Confirmed, Cancelled) | (Confirmed, Shipped) | (Shipped, Delivered) => {
                self.order_status = to;
            }
            _ => return Err(OrderError::InvalidTransition { from, to }),
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::AttachGatewayOrder(gateway_order_id) => {
                self.ensure_payable()?;
                if self.payment_status == PaymentStatus::Success {
                    return Err(OrderError::AlreadyPaid);
                }
                self.gateway_order_id = Some(gateway_order_id);
                Ok(OrderActionResult::GatewayOrderAttached)
            }
            OrderAction::VerifyPayment(receipt) => {
                self.ensure_payable()?;
                self.verify_payment(receipt, ctx)
            }
        }
    }
}

impl Order {
    fn ensure_payable(&self) -> Result<(), OrderError> {
        if self.payment_method != PaymentMethod::Gateway {
            return Err(OrderError::NotGatewayOrder);
        }
        if self.order_status == OrderStatus::Cancelled {
            return Err(OrderError::InvalidTransition {
                from: OrderStatus::Cancelled,
                to: OrderStatus::Confirmed,
            });
        }
        Ok(())
    }

    fn verify_payment(
        &mut self,
        receipt: GatewayReceipt,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, OrderError> {
        if self.payment_status == PaymentStatus::Success {
            // A repeated confirmation for the same payment is not an error.
            return match &self.gateway_payment_id {
                Some(paid) if *paid == receipt.gateway_payment_id => {
                    Ok(OrderActionResult::PaymentVerified)
                }
                _ => Err(OrderError::AlreadyPaid),
            };
        }

        let expected = self.gateway_order_id.clone().unwrap_or_default();
        if expected != receipt.gateway_order_id {
            return Err(OrderError::GatewayOrderMismatch {
                expected,
                received: receipt.gateway_order_id,
            });
        }

        if !ctx.signer.verify(&receipt) {
            warn!(order_id = %self.id, "Payment signature mismatch");
            self.payment_status = PaymentStatus::Failed;
            return Err(OrderError::InvalidSignature);
        }

        self.payment_status = PaymentStatus::Success;
        self.order_status = OrderStatus::Confirmed;
        self.gateway_payment_id = Some(receipt.gateway_payment_id);
        info!(order_id = %self.id, "Payment verified");
        Ok(OrderActionResult::PaymentVerified)
    }
}

//! # Order Actor
//!
//! The in-memory order store. It is the authority on what an order costs and
//! whether it has been paid:
//!
//! - **Creation** (`on_create`): rejects empty orders, incomplete addresses,
//!   unserviceable pincodes and pay-on-delivery where it is not offered, then
//!   recomputes the totals itself. Pay-on-delivery orders start `Confirmed`,
//!   gateway orders start `Pending` until their payment is verified.
//! - **Payment** ([`OrderAction::VerifyPayment`]): checks the gateway's HMAC
//!   signature over the transaction identifiers. A forged receipt marks the
//!   payment `Failed` and leaves the order unconfirmed.
//! - **Fulfilment** (`update`): `Confirmed → Shipped → Delivered`, or
//!   cancellation before shipping.
//!
//! The actor depends on the delivery area and the tax rate, injected as an
//! [`OrderContext`] when it is started:
//!
//! ```rust,ignore
//! let (actor, client) = order_actor::new(32);
//! tokio::spawn(actor.run(OrderContext { pincodes, tax_rates, policy, signer }));
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::backend::PaymentSigner;
use crate::model::Order;
use crate::pricing::PricingPolicy;
use crate::services::{PincodeService, TaxRateSource};
use resource_actor::{ResourceActor, ResourceClient};
use std::sync::Arc;

/// Dependencies of the Order actor.
#[derive(Clone)]
pub struct OrderContext {
    pub pincodes: Arc<dyn PincodeService>,
    pub tax_rates: Arc<dyn TaxRateSource>,
    pub policy: PricingPolicy,
    pub signer: PaymentSigner,
}

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}

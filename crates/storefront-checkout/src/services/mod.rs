//! # Checkout Collaborators
//!
//! Every remote dependency of the checkout session is an injected trait object.
//! Tests substitute scripted fakes.
//!
//! | Trait | Input | Output |
//! |-------|-------|--------|
//! | [`PincodeService`] | 6-digit pincode | [`DeliveryQuote`] or `NotServiceable` |
//! | [`OrderService`] | [`OrderRequest`] | [`OrderId`] |
//! | [`PaymentGatewayService`] | amount in minor units | [`GatewayHandle`] |
//! | [`PaymentVerifier`] | [`GatewayReceipt`] + [`OrderId`] | success / failure |
//! | [`TaxRateSource`] | (none) | tax rate percent |
//! | [`GatewayCheckout`] | [`GatewayHandle`] | [`GatewayOutcome`] |
//!
//! In-memory implementations live in [`crate::backend`] and [`crate::clients`].

mod error;

pub use error::ServiceError;

use crate::model::{
    DeliveryQuote, GatewayHandle, GatewayOutcome, GatewayReceipt, OrderId, OrderRequest, Pincode,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

#[async_trait]
pub trait PincodeService: Send + Sync {
    /// Shipping charge and COD eligibility for `pincode`.
    async fn lookup(&self, pincode: &Pincode) -> Result<DeliveryQuote, ServiceError>;
}

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Persists an order and returns its id.
    async fn create_order(&self, request: OrderRequest) -> Result<OrderId, ServiceError>;
}

#[async_trait]
pub trait PaymentGatewayService: Send + Sync {
    /// Registers a pending charge of `amount_minor` with the gateway.
    async fn create_gateway_order(&self, amount_minor: u64) -> Result<GatewayHandle, ServiceError>;
}

#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// Checks the gateway's signed identifiers and confirms `order_id` on success.
    async fn verify_payment(
        &self,
        receipt: &GatewayReceipt,
        order_id: OrderId,
    ) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait TaxRateSource: Send + Sync {
    async fn tax_rate_percent(&self) -> Result<Decimal, ServiceError>;
}

/// The gateway's confirmation UI.
#[async_trait]
pub trait GatewayCheckout: Send + Sync {
    /// Shows the payment UI for `handle` and resolves once the customer leaves it.
    async fn present(&self, handle: &GatewayHandle, order_id: OrderId) -> GatewayOutcome;
}

/// The full set of collaborators a checkout session needs.
#[derive(Clone)]
pub struct CheckoutServices {
    pub pincodes: Arc<dyn PincodeService>,
    pub orders: Arc<dyn OrderService>,
    pub gateway: Arc<dyn PaymentGatewayService>,
    pub verifier: Arc<dyn PaymentVerifier>,
    pub tax_rates: Arc<dyn TaxRateSource>,
    pub gateway_ui: Arc<dyn GatewayCheckout>,
}

impl std::fmt::Debug for CheckoutServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutServices").finish_non_exhaustive()
    }
}

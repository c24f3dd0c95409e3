//! A stand-in for the hosted payment gateway.
//!
//! [`SimulatedGateway`] registers charges and plays the customer's side of the
//! confirmation UI from a script, signing receipts with the same merchant
//! secret the order store verifies against.

use crate::backend::PaymentSigner;
use crate::model::{GatewayHandle, GatewayOutcome, OrderId};
use crate::services::{GatewayCheckout, PaymentGatewayService, ServiceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// What the simulated customer does when the confirmation UI opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayScript {
    /// Pays; the receipt carries a valid signature.
    Pay,
    /// Closes the UI without paying.
    Dismiss,
    /// The gateway reports an error.
    Fail(String),
    /// Returns a receipt whose signature was not produced with the merchant secret.
    ForgeSignature,
}

pub struct SimulatedGateway {
    currency: String,
    signer: PaymentSigner,
    script: Mutex<VecDeque<GatewayScript>>,
}

impl std::fmt::Debug for SimulatedGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedGateway")
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

impl SimulatedGateway {
    pub fn new(currency: impl Into<String>, signer: PaymentSigner) -> Self {
        Self {
            currency: currency.into(),
            signer,
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues the customer's behaviour for the next confirmation. With nothing
    /// queued the customer pays.
    pub fn push_script(&self, step: GatewayScript) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(step);
    }

    fn next_step(&self) -> GatewayScript {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(GatewayScript::Pay)
    }
}

/// `<prefix>_<12 hex digits>`
fn simulated_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &hex[..12])
}

#[async_trait]
impl PaymentGatewayService for SimulatedGateway {
    #[instrument(skip(self))]
    async fn create_gateway_order(&self, amount_minor: u64) -> Result<GatewayHandle, ServiceError> {
        if amount_minor == 0 {
            return Err(ServiceError::rejected("Amount must be greater than zero"));
        }
        let handle = GatewayHandle {
            gateway_order_id: simulated_id("order_sim"),
            amount_minor,
            currency: self.currency.clone(),
        };
        info!(gateway_order_id = %handle.gateway_order_id, "Gateway order registered");
        Ok(handle)
    }
}

#[async_trait]
impl GatewayCheckout for SimulatedGateway {
    #[instrument(skip(self, handle), fields(gateway_order_id = %handle.gateway_order_id))]
    async fn present(&self, handle: &GatewayHandle, order_id: OrderId) -> GatewayOutcome {
        let payment_id = simulated_id("pay_sim");
        match self.next_step() {
            GatewayScript::Pay => {
                info!(%order_id, %payment_id, "Customer paid");
                GatewayOutcome::Paid(self.signer.receipt(&handle.gateway_order_id, &payment_id))
            }
            GatewayScript::Dismiss => {
                info!(%order_id, "Customer closed the payment window");
                GatewayOutcome::Dismissed
            }
            GatewayScript::Fail(reason) => {
                warn!(%order_id, %reason, "Gateway failure");
                GatewayOutcome::Failed(reason)
            }
            GatewayScript::ForgeSignature => {
                warn!(%order_id, "Returning a forged receipt");
                let mut receipt = self.signer.receipt(&handle.gateway_order_id, &payment_id);
                receipt.signature = "0".repeat(receipt.signature.len());
                GatewayOutcome::Paid(receipt)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> SimulatedGateway {
        SimulatedGateway::new("INR", PaymentSigner::new("merchant-secret").unwrap())
    }

    #[tokio::test]
    async fn test_handles_follow_naming_scheme() {
        let gateway = gateway();
        let handle = gateway.create_gateway_order(235_800).await.unwrap();

        let suffix = handle.gateway_order_id.strip_prefix("order_sim_").unwrap();
        assert_eq!(suffix.len(), 12);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(handle.amount_minor, 235_800);
        assert_eq!(handle.currency, "INR");
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected() {
        assert!(matches!(
            gateway().create_gateway_order(0).await,
            Err(ServiceError::Rejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_script_drives_outcomes_in_order() {
        let signer = PaymentSigner::new("merchant-secret").unwrap();
        let gateway = SimulatedGateway::new("INR", signer.clone());
        gateway.push_script(GatewayScript::Dismiss);
        gateway.push_script(GatewayScript::ForgeSignature);
        gateway.push_script(GatewayScript::Fail("card declined".into()));
        let handle = gateway.create_gateway_order(100).await.unwrap();

        assert_eq!(gateway.present(&handle, OrderId(1)).await, GatewayOutcome::Dismissed);

        let GatewayOutcome::Paid(forged) = gateway.present(&handle, OrderId(1)).await else {
            panic!("expected a receipt");
        };
        assert!(!signer.verify(&forged));

        assert_eq!(
            gateway.present(&handle, OrderId(1)).await,
            GatewayOutcome::Failed("card declined".into())
        );

        // Script exhausted: the customer pays.
        let GatewayOutcome::Paid(receipt) = gateway.present(&handle, OrderId(1)).await else {
            panic!("expected a receipt");
        };
        assert_eq!(receipt.gateway_order_id, handle.gateway_order_id);
        assert!(signer.verify(&receipt));
    }
}

//! HMAC-SHA256 signatures over gateway transaction identifiers.
//!
//! The gateway signs `"{gateway_order_id}|{gateway_payment_id}"` with the
//! merchant secret and returns the hex digest alongside the ids. The order store
//! recomputes it before confirming a payment.

use crate::model::GatewayReceipt;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SignatureError {
    #[error("Gateway secret must not be empty")]
    EmptySecret,
    #[error("Invalid gateway secret: {0}")]
    InvalidKey(String),
}

/// Signs and verifies receipts with a shared merchant secret.
///
/// The keyed MAC is built once; each signature starts from a clone of it.
#[derive(Clone)]
pub struct PaymentSigner {
    mac: HmacSha256,
}

impl std::fmt::Debug for PaymentSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PaymentSigner { .. }")
    }
}

impl PaymentSigner {
    pub fn new(secret: &str) -> Result<Self, SignatureError> {
        if secret.is_empty() {
            return Err(SignatureError::EmptySecret);
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Hex-encoded signature for a gateway order / payment pair.
    pub fn sign(&self, gateway_order_id: &str, gateway_payment_id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(signing_payload(gateway_order_id, gateway_payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks the receipt's signature in constant time.
    ///
    /// A signature that is not valid hex is simply a mismatch.
    pub fn verify(&self, receipt: &GatewayReceipt) -> bool {
        let Ok(expected) = hex::decode(&receipt.signature) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(
            signing_payload(&receipt.gateway_order_id, &receipt.gateway_payment_id).as_bytes(),
        );
        mac.verify_slice(&expected).is_ok()
    }

    /// Builds a receipt the way the gateway would after a successful payment.
    pub fn receipt(&self, gateway_order_id: &str, gateway_payment_id: &str) -> GatewayReceipt {
        GatewayReceipt {
            gateway_order_id: gateway_order_id.to_string(),
            gateway_payment_id: gateway_payment_id.to_string(),
            signature: self.sign(gateway_order_id, gateway_payment_id),
        }
    }
}

fn signing_payload(gateway_order_id: &str, gateway_payment_id: &str) -> String {
    format!("{gateway_order_id}|{gateway_payment_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_known_hmac_vector() {
        // RFC 4231 test case 2: key "Jefe"
        let signer = PaymentSigner::new("Jefe").unwrap();
        let mut mac = signer.mac.clone();
        mac.update(b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac.finalize().into_bytes()),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_signed_receipt_verifies() {
        let signer = PaymentSigner::new("merchant-secret").unwrap();
        let receipt = signer.receipt("order_sim_1", "pay_1");
        assert_eq!(receipt.signature.len(), 64);
        assert!(signer.verify(&receipt));
    }

    #[test]
    fn test_tampered_receipt_fails() {
        let signer = PaymentSigner::new("merchant-secret").unwrap();
        let mut receipt = signer.receipt("order_sim_1", "pay_1");
        receipt.gateway_payment_id = "pay_2".into();
        assert!(!signer.verify(&receipt));

        let mut garbled = signer.receipt("order_sim_1", "pay_1");
        garbled.signature = "not-hex".into();
        assert!(!signer.verify(&garbled));
    }

    #[test]
    fn test_other_secret_does_not_verify() {
        let ours = PaymentSigner::new("merchant-secret").unwrap();
        let theirs = PaymentSigner::new("someone-else").unwrap();
        assert!(!ours.verify(&theirs.receipt("order_sim_1", "pay_1")));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert_eq!(PaymentSigner::new("").unwrap_err(), SignatureError::EmptySecret);
    }
}

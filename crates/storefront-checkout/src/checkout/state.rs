use crate::model::{DeliveryQuote, GatewayHandle, OrderId};

/// Where a checkout session stands.
///
/// ```text
/// Idle → QuoteChecking → QuoteKnown → PlacingOrder ─┬→ AwaitingGatewayConfirmation → Verifying → Completed
///                                                   └→ Completed (pay on delivery)
/// ```
///
/// Any step can fail into `Error`, which remembers the stable state
/// (`Idle` or `QuoteKnown`) to return to so the customer can retry.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    Idle,
    QuoteChecking,
    QuoteKnown { quote: DeliveryQuote },
    PlacingOrder,
    AwaitingGatewayConfirmation {
        order_id: OrderId,
        handle: GatewayHandle,
    },
    Verifying { order_id: OrderId },
    Completed { order_id: OrderId },
    Error {
        message: String,
        resume: Box<CheckoutState>,
    },
}

impl CheckoutState {
    pub fn error(message: impl Into<String>, resume: CheckoutState) -> Self {
        CheckoutState::Error {
            message: message.into(),
            resume: Box::new(resume.resting()),
        }
    }

    /// Waiting on a quote check or an order placement.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            CheckoutState::QuoteChecking
                | CheckoutState::PlacingOrder
                | CheckoutState::AwaitingGatewayConfirmation { .. }
                | CheckoutState::Verifying { .. }
        )
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CheckoutState::Completed { .. })
    }

    /// The stable state this one behaves like: `Error` behaves like the state
    /// it resumes, transient states fall back to `Idle`.
    pub fn resting(self) -> CheckoutState {
        match self {
            CheckoutState::Error { resume, .. } => (*resume).resting(),
            state @ (CheckoutState::Idle
            | CheckoutState::QuoteKnown { .. }
            | CheckoutState::Completed { .. }) => state,
            _ => CheckoutState::Idle,
        }
    }

    pub fn quote(&self) -> Option<&DeliveryQuote> {
        match self {
            CheckoutState::QuoteKnown { quote } => Some(quote),
            CheckoutState::Error { resume, .. } => resume.quote(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn quote_known() -> CheckoutState {
        CheckoutState::QuoteKnown {
            quote: DeliveryQuote {
                pincode: "411001".parse().unwrap(),
                shipping_charge: Decimal::from(50),
                cod_available: true,
            },
        }
    }

    #[test]
    fn test_error_resumes_stable_state_only() {
        let error = CheckoutState::error("boom", CheckoutState::PlacingOrder);
        assert_eq!(error.clone().resting(), CheckoutState::Idle);

        let nested = CheckoutState::error("again", CheckoutState::error("boom", quote_known()));
        let CheckoutState::Error { resume, .. } = &nested else {
            panic!("expected error state");
        };
        assert_eq!(**resume, quote_known());
        assert!(nested.quote().is_some());
    }

    #[test]
    fn test_in_flight_states() {
        assert!(CheckoutState::QuoteChecking.is_in_flight());
        assert!(CheckoutState::Verifying { order_id: OrderId(1) }.is_in_flight());
        assert!(!quote_known().is_in_flight());
        assert!(!CheckoutState::error("boom", quote_known()).is_in_flight());
        assert!(CheckoutState::Completed { order_id: OrderId(1) }.is_completed());
    }
}

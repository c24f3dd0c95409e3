use crate::model::Pincode;
use thiserror::Error;

/// Failures reported by a remote collaborator.
///
/// The checkout session turns these into notices: the server's message when
/// there is one, a generic message otherwise.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// The pincode is outside the delivery area.
    #[error("Delivery not available for pincode {0}")]
    NotServiceable(Pincode),

    /// The service answered with a refusal and an explanation.
    #[error("{message}")]
    Rejected { message: String },

    /// The gateway's signed identifiers were not accepted.
    #[error("Payment verification failed: {message}")]
    VerificationFailed { message: String },

    /// No usable answer (transport failure, timeout, closed actor).
    #[error("Service unavailable")]
    Unavailable,
}

impl ServiceError {
    pub fn rejected(message: impl Into<String>) -> Self {
        ServiceError::Rejected {
            message: message.into(),
        }
    }

    /// The message worth showing to the customer, if the service provided one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ServiceError::NotServiceable(_) => Some(self.to_string()),
            ServiceError::Rejected { message } | ServiceError::VerificationFailed { message } => {
                Some(message.clone())
            }
            ServiceError::Unavailable => None,
        }
    }
}

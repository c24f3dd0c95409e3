//! # In-memory Backend
//!
//! Reference implementations of the checkout collaborators that do not need an
//! actor: the delivery area, the payment gateway, receipt signing and the tax
//! rate. Orders are served by the order actor through
//! [`OrderClient`](crate::clients::OrderClient).

pub mod gateway;
pub mod pincodes;
pub mod signature;
pub mod tax;

pub use gateway::{GatewayScript, SimulatedGateway};
pub use pincodes::{PincodeDirectory, ServiceablePincode};
pub use signature::{PaymentSigner, SignatureError};
pub use tax::FixedTaxRate;

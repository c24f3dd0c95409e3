//! # Checkout Session
//!
//! Drives one customer from a locked cart to a confirmed order.
//!
//! The customer enters a pincode and an address, checks delivery, picks a
//! payment method and places the order. [`CheckoutSession::place_order`] then
//! follows one of two paths:
//!
//! - **Gateway**: register the grand total (in minor units) with the gateway,
//!   persist the order, present the gateway's confirmation UI, verify the
//!   returned signature, and only then clear the cart.
//! - **Pay on delivery**: persist the order and clear the cart.
//!
//! Progress is published on a `watch` channel of [`CheckoutState`]; messages
//! for the customer go out as [`Notice`]s on a broadcast channel.

mod notice;
mod session;
mod state;

pub use notice::{Notice, NoticeLevel};
pub use session::{CheckoutError, CheckoutSession, Placement};
pub use state::CheckoutState;

//! # Storefront Checkout
//!
//! Order totals and payment-confirmation sequencing for an apparel storefront.
//!
//! - [`pricing`]: subtotal, tax, shipping and grand total from cart lines and a delivery quote.
//! - [`checkout`]: the [`CheckoutSession`](checkout::CheckoutSession) state machine for the
//!   gateway and pay-on-delivery paths.
//! - [`services`]: the injected collaborators checkout depends on.
//! - [`cart_actor`] / [`order_actor`]: carts and orders, each owned by a
//!   [`ResourceActor`](resource_actor::ResourceActor), reached through [`clients`].
//! - [`backend`]: in-memory delivery area, simulated gateway and receipt signing.
//! - [`lifecycle`]: [`StorefrontSystem`](lifecycle::StorefrontSystem) wires it all together.

pub mod backend;
pub mod cart_actor;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod pricing;
pub mod services;

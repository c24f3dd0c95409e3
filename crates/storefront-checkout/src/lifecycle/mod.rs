//! # System Lifecycle
//!
//! Starts, wires and stops the storefront's actors.
//!
//! Actors are created first and receive their dependencies when they are run,
//! so construction never has to care about dependency order:
//!
//! ```rust,ignore
//! let (cart_actor, carts) = cart_actor::new(buffer);
//! let (order_actor, orders) = order_actor::new(buffer);
//!
//! tokio::spawn(cart_actor.run(()));
//! tokio::spawn(order_actor.run(OrderContext { pincodes, tax_rates, policy, signer }));
//! ```
//!
//! The order actor's context holds the delivery area and the tax rate, never a
//! client of another actor, so the dependency graph is acyclic and shutdown is
//! just dropping every client and awaiting the tasks: each actor leaves its
//! loop when its channel closes.
//!
//! Logging is set up once by the binary with
//! [`resource_actor::tracing::setup_tracing`]; `RUST_LOG=debug` shows request
//! payloads.

pub mod storefront_system;

pub use storefront_system::*;

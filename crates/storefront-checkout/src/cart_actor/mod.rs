//! # Cart Actor
//!
//! Owns every shopping cart. Lines change only through [`CartAction`]s, and each
//! successful action is published to subscribers of the cart client, which is
//! how other parts of the storefront learn that the cart changed.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](resource_actor::ActorEntity) implementation for [`Cart`](crate::model::Cart)
//! - [`error`] - [`CartError`]
//! - [`actions`] - [`CartAction`] and [`CartActionResult`]
//! - [`new()`] - Factory function that creates the actor and its generic client
//!
//! ## Usage
//!
//! ```rust
//! use resource_actor::ActorClient;
//! use storefront_checkout::cart_actor;
//! use storefront_checkout::clients::CartClient;
//! use storefront_checkout::model::CartLine;
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = cart_actor::new(32);
//!     let client = CartClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let cart_id = client.create_cart(Vec::new()).await?;
//!     let mut changes = client.subscribe();
//!     client
//!         .add_line(cart_id, CartLine::new("hoodie", "Hoodie", "M", 2, Decimal::from(999)))
//!         .await?;
//!     assert_eq!(changes.recv().await?.id(), &cart_id);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Cart;
use resource_actor::{ResourceActor, ResourceClient};

/// Creates a new Cart actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Cart>, ResourceClient<Cart>) {
    ResourceActor::new(buffer_size)
}

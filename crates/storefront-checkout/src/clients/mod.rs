//! Type-safe wrappers around [`ResourceClient`](resource_actor::ResourceClient).

pub mod cart_client;
pub mod order_client;

pub use cart_client::*;
pub use order_client::*;

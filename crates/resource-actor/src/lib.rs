//! # Resource Actor
//!
//! Building blocks for state owned by a single Tokio task and reached through
//! message passing. Each resource type (a cart, an order) gets one
//! [`ResourceActor`] holding every instance in a private store; callers talk to
//! it through a cloneable [`ResourceClient`].
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): domain data plus lifecycle hooks and custom actions.
//! 2. **Runtime** ([`ResourceActor`]): the sequential request loop and the store.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed async calls and
//!    change subscriptions ([`ResourceEvent`]).
//!
//! Requests for one actor are handled one at a time, so hooks can mutate the
//! entity without locks. Different actors run in parallel.
//!
//! ## Example
//!
//! ```rust
//! use resource_actor::{ActorEntity, ResourceActor, ResourceEvent};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Counter { id: u32, value: u64 }
//!
//! #[derive(Debug)] struct CounterCreate;
//! #[derive(Debug)] enum CounterAction { Add(u64) }
//! #[derive(Debug, thiserror::Error)] #[error("counter overflow")] struct CounterError;
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = u32;
//!     type Create = CounterCreate;
//!     type Update = ();
//!     type Action = CounterAction;
//!     type ActionResult = u64;
//!     type Context = ();
//!     type Error = CounterError;
//!
//!     fn from_create_params(id: u32, _: CounterCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, value: 0 })
//!     }
//!
//!     async fn handle_action(&mut self, action: CounterAction, _: &()) -> Result<u64, Self::Error> {
//!         match action {
//!             CounterAction::Add(n) => {
//!                 self.value = self.value.checked_add(n).ok_or(CounterError)?;
//!                 Ok(self.value)
//!             }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Counter>::new(10);
//!     let mut events = client.subscribe();
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(CounterCreate).await.unwrap();
//!     assert_eq!(client.perform_action(id, CounterAction::Add(5)).await.unwrap(), 5);
//!
//!     assert_eq!(events.recv().await.unwrap(), ResourceEvent::Created(id));
//!     assert_eq!(events.recv().await.unwrap(), ResourceEvent::ActionApplied(id));
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module answers client requests from a queue of expectations so
//! domain clients can be tested without a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod event;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use event::ResourceEvent;
pub use message::{ResourceRequest, Response};

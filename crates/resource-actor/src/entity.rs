//! # ActorEntity Trait
//!
//! The contract a resource (a cart, an order, ...) implements to be owned by a
//! [`ResourceActor`](crate::ResourceActor). Associated types pin down the id, the
//! creation payload, the update payload, the custom actions and the error type,
//! so a cart action can never be sent to the order actor.
//!
//! Hooks receive the actor's `Context`, which is supplied to
//! [`ResourceActor::run`](crate::ResourceActor::run) rather than at construction.
//! This lets actors that depend on each other be created first and wired afterwards.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource must implement to be managed by a `ResourceActor`.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The identifier. Generated by the actor from a `u32` counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Payload used to replace part of an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations (e.g. `AddLine`, `VerifyPayment`).
    type Action: Send + Sync + Debug;

    /// Result returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected into every hook. Use `()` if there are none.
    type Context: Send + Sync;

    /// One error enum per entity, shared by every hook and action.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the entity from its id and creation payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Runs after construction and before the entity is stored.
    /// Returning an error discards the entity.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update. Entities without updates use `type Update = ();` and keep the no-op default.
    async fn on_update(
        &mut self,
        _update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

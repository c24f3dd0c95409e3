//! # ActorClient Trait
//!
//! Shared behaviour for domain clients that wrap a [`ResourceClient`]: fetching
//! by id and subscribing to change events, with runtime errors mapped into the
//! domain's own error type.

use crate::{ActorEntity, FrameworkError, ResourceClient, ResourceEvent};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Trait for resource-specific clients.
///
/// Implementors provide [`ActorClient::inner`] and [`ActorClient::map_error`];
/// `get` and `subscribe` come for free.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic client.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map runtime errors to the resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Subscribe to change events for every entity of this type.
    fn subscribe(&self) -> broadcast::Receiver<ResourceEvent<T::Id>> {
        self.inner().subscribe()
    }
}

//! # Generic Actor Server
//!
//! `ResourceActor` owns the in-memory store for one entity type and processes
//! requests one at a time, so the store needs no locking. After each successful
//! mutation it publishes a [`ResourceEvent`] for subscribers.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::event::{ResourceEvent, EVENT_CAPACITY};
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// The server half of a resource actor.
///
/// Create it with [`ResourceActor::new`], hand the returned client to callers,
/// then spawn [`ResourceActor::run`] with the entity's context:
///
/// ```rust,ignore
/// let (actor, client) = ResourceActor::<Cart>::new(32);
/// tokio::spawn(actor.run(()));
/// let id = client.create(CartCreate::default()).await?;
/// ```
///
/// Ids are generated from an internal `u32` counter starting at 1.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    events: broadcast::Sender<ResourceEvent<T::Id>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` bounds the request channel; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let actor = Self {
            receiver,
            events: events.clone(),
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender, events);
        (actor, client)
    }

    fn publish(&self, event: ResourceEvent<T::Id>) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        // "Cart" rather than "storefront_checkout::model::cart::Cart"
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.insert(id.clone(), item);
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    self.publish(ResourceEvent::Created(id.clone()));
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    let snapshot = item.clone();
                    info!(entity_type, %id, "Updated");
                    self.publish(ResourceEvent::Updated(id));
                    let _ = respond_to.send(Ok(snapshot));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    match item.handle_action(action, &context).await {
                        Ok(result) => {
                            info!(entity_type, %id, "Action ok");
                            self.publish(ResourceEvent::ActionApplied(id));
                            let _ = respond_to.send(Ok(result));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

//! # Change Events
//!
//! Every successful mutation handled by a [`ResourceActor`](crate::ResourceActor) is
//! published as a [`ResourceEvent`] on a broadcast channel. Views that need to refresh
//! when a resource changes subscribe through
//! [`ResourceClient::subscribe`](crate::ResourceClient::subscribe); there is no global bus.
//!
//! Slow subscribers may observe `RecvError::Lagged` and should re-read the resource.

/// Capacity of the per-actor broadcast channel.
pub const EVENT_CAPACITY: usize = 64;

/// A change notification for a single resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent<Id> {
    /// The resource was created.
    Created(Id),
    /// The resource was replaced through an update.
    Updated(Id),
    /// A custom action completed successfully.
    ActionApplied(Id),
}

impl<Id> ResourceEvent<Id> {
    /// The id of the resource this event refers to.
    pub fn id(&self) -> &Id {
        match self {
            ResourceEvent::Created(id)
            | ResourceEvent::Updated(id)
            | ResourceEvent::ActionApplied(id) => id,
        }
    }
}

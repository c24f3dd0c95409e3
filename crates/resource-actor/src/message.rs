//! # Requests
//!
//! Messages sent from a [`ResourceClient`](crate::ResourceClient) to its
//! [`ResourceActor`](crate::ResourceActor). Each carries a oneshot sender for the reply.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Reply channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A request handled by the actor loop.
///
/// `Create`, `Get` and `Update` cover the generic lifecycle; anything
/// resource-specific goes through `Action` with the entity's own action enum.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

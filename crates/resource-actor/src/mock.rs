//! # Mock Clients
//!
//! Test support for code that talks to a [`ResourceClient`] without spawning the
//! real actor.
//!
//! Two styles are available:
//!
//! - [`MockClient`]: queue expectations up front (`expect_get`, `expect_create`,
//!   `expect_action`) and let a background task answer requests in order.
//!   Call [`MockClient::verify`] at the end of the test.
//! - [`create_mock_client`] with [`expect_create`], [`expect_get`] and
//!   [`expect_action`]: drive the conversation by hand and inspect each payload
//!   before replying.
//!
//! ```rust,ignore
//! let mut carts = MockClient::<Cart>::new();
//! carts.expect_action(CartId(1)).return_ok(CartActionResult::Cleared);
//! let client = CartClient::new(carts.client());
//! client.clear(CartId(1)).await?;
//! carts.verify();
//! ```

use crate::{ActorEntity, FrameworkError, ResourceClient, ResourceEvent, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{broadcast, mpsc, oneshot};

enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
}

impl<T: ActorEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Get(_) => "get",
            Expectation::Create(_) => "create",
            Expectation::Action(_) => "action",
        }
    }
}

fn request_name<T: ActorEntity>(request: &ResourceRequest<T>) -> &'static str {
    match request {
        ResourceRequest::Create { .. } => "create",
        ResourceRequest::Get { .. } => "get",
        ResourceRequest::Update { .. } => "update",
        ResourceRequest::Action { .. } => "action",
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn push<T: ActorEntity>(queue: &Queue<T>, expectation: Expectation<T>) {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push_back(expectation);
}

/// A client whose requests are answered from a queue of expectations.
///
/// Requests that arrive out of order, or with no expectation left, panic the
/// responder task; the pending call then fails with `FrameworkError::ActorDropped`.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    events: broadcast::Sender<ResourceEvent<T::Id>>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let (events, _) = broadcast::channel(crate::event::EVENT_CAPACITY);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { respond_to, .. },
                        Some(Expectation::Action(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        let expected = expectation.as_ref().map_or("nothing", Expectation::name);
                        panic!("Unexpected {} request; expected {expected}", request_name(&request));
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender, events.clone()),
            events,
            expectations,
            _handle: handle,
        }
    }

    /// A client connected to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Publish an event to subscribers, as the real actor would after a mutation.
    pub fn emit(&self, event: ResourceEvent<T::Id>) {
        let _ = self.events.send(event);
    }

    /// Expects a `get`.
    pub fn expect_get(&mut self, _id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Get)
    }

    /// Expects a `create`.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Create)
    }

    /// Expects a `perform_action`.
    pub fn expect_action(&mut self, _id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Action)
    }

    /// Panics if any queued expectation was not consumed.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        assert_eq!(remaining, 0, "Not all expectations were met. {remaining} remaining");
    }
}

/// Completes an expectation with the value the mock should reply with.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    queue: Queue<T>,
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(queue: Queue<T>, wrap: fn(Result<R, FrameworkError>) -> Expectation<T>) -> Self {
        Self { queue, wrap }
    }

    /// Reply with a successful result.
    pub fn return_ok(self, value: R) {
        push(&self.queue, (self.wrap)(Ok(value)));
    }

    /// Reply with an error.
    pub fn return_err(self, error: FrameworkError) {
        push(&self.queue, (self.wrap)(Err(error)));
    }
}

/// A client plus the raw receiving end of its request channel.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (events, _) = broadcast::channel(crate::event::EVENT_CAPACITY);
    (ResourceClient::new(sender, events), receiver)
}

/// Waits for the next request and returns it if it is a `Create`.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a `Get`.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is an `Action`.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

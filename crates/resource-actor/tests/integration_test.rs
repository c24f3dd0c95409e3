use async_trait::async_trait;
use resource_actor::mock::{create_mock_client, expect_action, expect_create, MockClient};
use resource_actor::{ActorEntity, FrameworkError, ResourceActor, ResourceEvent};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Shelf {
    id: u32,
    label: String,
    stock: u32,
}

#[derive(Debug)]
struct ShelfCreate {
    label: String,
    stock: u32,
}

#[derive(Debug)]
struct ShelfRelabel(String);

#[derive(Debug)]
enum ShelfAction {
    Take(u32),
}

#[derive(Debug, PartialEq, thiserror::Error)]
enum ShelfError {
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("only {available} left")]
    Short { available: u32 },
}

#[async_trait]
impl ActorEntity for Shelf {
    type Id = u32;
    type Create = ShelfCreate;
    type Update = ShelfRelabel;
    type Action = ShelfAction;
    type ActionResult = u32;
    type Context = ();
    type Error = ShelfError;

    fn from_create_params(id: u32, params: ShelfCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            label: params.label,
            stock: params.stock,
        })
    }

    async fn on_create(&mut self, _ctx: &()) -> Result<(), Self::Error> {
        if self.label.is_empty() {
            return Err(ShelfError::EmptyLabel);
        }
        Ok(())
    }

    async fn on_update(&mut self, update: ShelfRelabel, _ctx: &()) -> Result<(), Self::Error> {
        self.label = update.0;
        Ok(())
    }

    async fn handle_action(&mut self, action: ShelfAction, _ctx: &()) -> Result<u32, Self::Error> {
        match action {
            ShelfAction::Take(n) if n > self.stock => Err(ShelfError::Short {
                available: self.stock,
            }),
            ShelfAction::Take(n) => {
                self.stock -= n;
                Ok(self.stock)
            }
        }
    }
}

fn shelf(label: &str, stock: u32) -> ShelfCreate {
    ShelfCreate {
        label: label.into(),
        stock,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_full_lifecycle_publishes_events() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    let mut events = client.subscribe();
    let handle = tokio::spawn(actor.run(()));

    let id = client.create(shelf("tees", 10)).await.unwrap();
    assert_eq!(id, 1); // first id is 1

    let left = client.perform_action(id, ShelfAction::Take(4)).await.unwrap();
    assert_eq!(left, 6);

    let relabelled = client.update(id, ShelfRelabel("polos".into())).await.unwrap();
    assert_eq!(relabelled.label, "polos");
    assert_eq!(relabelled.stock, 6);

    assert_eq!(events.recv().await.unwrap(), ResourceEvent::Created(1));
    assert_eq!(events.recv().await.unwrap(), ResourceEvent::ActionApplied(1));
    assert_eq!(events.recv().await.unwrap(), ResourceEvent::Updated(1));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_failed_action_keeps_state_and_publishes_nothing() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(shelf("caps", 2)).await.unwrap();
    let mut events = client.subscribe();

    let err = client
        .perform_action(id, ShelfAction::Take(3))
        .await
        .unwrap_err();
    assert_eq!(
        err.into_entity_error::<ShelfError>().unwrap(),
        ShelfError::Short { available: 2 }
    );

    let current = client.get(id).await.unwrap().unwrap();
    assert_eq!(current.stock, 2);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_rejected_create_is_not_stored() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    tokio::spawn(actor.run(()));

    let err = client.create(shelf("", 1)).await.unwrap_err();
    assert_eq!(
        err.into_entity_error::<ShelfError>().unwrap(),
        ShelfError::EmptyLabel
    );

    // The id counter still advanced, but nothing was stored under it.
    assert!(client.get(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    tokio::spawn(actor.run(()));

    let err = client
        .perform_action(42, ShelfAction::Take(1))
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::NotFound(id) if id == "42"));
}

#[tokio::test]
async fn test_closed_actor_reports_actor_closed() {
    let (actor, client) = ResourceActor::<Shelf>::new(10);
    drop(actor);

    let err = client.get(1).await.unwrap_err();
    assert!(matches!(err, FrameworkError::ActorClosed));
}

#[tokio::test]
async fn test_mock_client_answers_in_order() {
    let mut mock = MockClient::<Shelf>::new();
    mock.expect_create().return_ok(7);
    mock.expect_action(7).return_ok(3);
    mock.expect_get(7).return_ok(None);

    let client = mock.client();
    assert_eq!(client.create(shelf("socks", 5)).await.unwrap(), 7);
    assert_eq!(client.perform_action(7, ShelfAction::Take(2)).await.unwrap(), 3);
    assert!(client.get(7).await.unwrap().is_none());

    mock.verify();
}

#[tokio::test]
async fn test_mock_client_emits_events_to_subscribers() {
    let mock = MockClient::<Shelf>::new();
    let mut events = mock.client().subscribe();

    mock.emit(ResourceEvent::Updated(9));
    assert_eq!(events.recv().await.unwrap(), ResourceEvent::Updated(9));
}

#[tokio::test]
async fn test_manual_mock_inspects_payloads() {
    let (client, mut receiver) = create_mock_client::<Shelf>(4);

    let task = tokio::spawn(async move {
        let id = client.create(shelf("belts", 1)).await?;
        client.perform_action(id, ShelfAction::Take(1)).await
    });

    let (params, reply) = expect_create(&mut receiver).await.expect("create request");
    assert_eq!(params.label, "belts");
    reply.send(Ok(5)).unwrap();

    let (id, action, reply) = expect_action(&mut receiver).await.expect("action request");
    assert_eq!(id, 5);
    assert!(matches!(action, ShelfAction::Take(1)));
    reply.send(Ok(0)).unwrap();

    assert_eq!(task.await.unwrap().unwrap(), 0);
}

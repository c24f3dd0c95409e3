//! # Cart Client
//!
//! High-level API over the Cart actor. Each mutating call returns the lines as
//! they stand afterwards; [`ActorClient::subscribe`] delivers a change event
//! after every successful mutation.

use crate::cart_actor::{CartAction, CartActionResult, CartError};
use crate::model::{Cart, CartCreate, CartId, CartLine, ProductId};
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

#[derive(Clone, Debug)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
}

#[async_trait]
impl ActorClient<Cart> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<Cart> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CartError::NotFound(id),
            other => other
                .into_entity_error::<CartError>()
                .unwrap_or_else(|e| CartError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn create_cart(&self, lines: Vec<CartLine>) -> Result<CartId, CartError> {
        debug!("Sending request");
        self.inner
            .create(CartCreate { lines })
            .await
            .map_err(Self::map_error)
    }

    /// Current contents of the cart.
    pub async fn snapshot(&self, id: CartId) -> Result<Cart, CartError> {
        self.get(id)
            .await?
            .ok_or_else(|| CartError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, line), fields(product_id = %line.product_id, size = %line.size))]
    pub async fn add_line(&self, id: CartId, line: CartLine) -> Result<Vec<CartLine>, CartError> {
        debug!("Sending request");
        self.lines_after(id, CartAction::AddLine(line)).await
    }

    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        id: CartId,
        product_id: ProductId,
        size: &str,
        quantity: u32,
    ) -> Result<Vec<CartLine>, CartError> {
        debug!("Sending request");
        let action = CartAction::SetQuantity {
            product_id,
            size: size.to_string(),
            quantity,
        };
        self.lines_after(id, action).await
    }

    #[instrument(skip(self))]
    pub async fn remove_line(
        &self,
        id: CartId,
        product_id: ProductId,
        size: &str,
    ) -> Result<Vec<CartLine>, CartError> {
        debug!("Sending request");
        let action = CartAction::RemoveLine {
            product_id,
            size: size.to_string(),
        };
        self.lines_after(id, action).await
    }

    #[instrument(skip(self))]
    pub async fn clear(&self, id: CartId) -> Result<(), CartError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, CartAction::Clear)
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    /// Locks the cart and returns the lines checkout will work from.
    #[instrument(skip(self))]
    pub async fn begin_checkout(&self, id: CartId) -> Result<Vec<CartLine>, CartError> {
        debug!("Sending request");
        self.lines_after(id, CartAction::BeginCheckout).await
    }

    #[instrument(skip(self))]
    pub async fn end_checkout(&self, id: CartId) -> Result<(), CartError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, CartAction::EndCheckout)
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    async fn lines_after(&self, id: CartId, action: CartAction) -> Result<Vec<CartLine>, CartError> {
        match self.inner.perform_action(id, action).await {
            Ok(CartActionResult::Lines(lines) | CartActionResult::Locked(lines)) => Ok(lines),
            Ok(CartActionResult::Cleared | CartActionResult::Unlocked) => Ok(Vec::new()),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_actor::mock::MockClient;
    use rust_decimal::Decimal;

    fn tee() -> CartLine {
        CartLine::new("tee", "Logo Tee", "M", 1, Decimal::from(499))
    }

    #[tokio::test]
    async fn test_add_line_returns_lines() {
        let mut mock = MockClient::<Cart>::new();
        mock.expect_action(CartId(1))
            .return_ok(CartActionResult::Lines(vec![tee()]));
        let client = CartClient::new(mock.client());

        let lines = client.add_line(CartId(1), tee()).await.unwrap();
        assert_eq!(lines, vec![tee()]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_entity_errors_are_recovered() {
        let mut mock = MockClient::<Cart>::new();
        mock.expect_action(CartId(1))
            .return_err(FrameworkError::EntityError(Box::new(CartError::Locked)));
        let client = CartClient::new(mock.client());

        assert_eq!(
            client.add_line(CartId(1), tee()).await.unwrap_err(),
            CartError::Locked
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_missing_cart_maps_to_not_found() {
        let mut mock = MockClient::<Cart>::new();
        mock.expect_get(CartId(9)).return_ok(None);
        mock.expect_action(CartId(9))
            .return_err(FrameworkError::NotFound("cart_9".into()));
        let client = CartClient::new(mock.client());

        assert_eq!(
            client.snapshot(CartId(9)).await.unwrap_err(),
            CartError::NotFound("cart_9".into())
        );
        assert_eq!(
            client.clear(CartId(9)).await.unwrap_err(),
            CartError::NotFound("cart_9".into())
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_actor_is_a_communication_error() {
        let (client, receiver) = resource_actor::mock::create_mock_client::<Cart>(4);
        drop(receiver);
        let client = CartClient::new(client);

        assert!(matches!(
            client.begin_checkout(CartId(1)).await,
            Err(CartError::ActorCommunicationError(_))
        ));
    }
}

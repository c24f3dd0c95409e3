//! # Order Client
//!
//! Provides a high-level API for interacting with the `Order` actor, and plugs
//! it into checkout as the [`OrderService`] and [`PaymentVerifier`].
//!
//! Validation and pricing happen in the Order actor's `on_create` hook; this
//! client only translates between actor errors and service errors.

use crate::model::{GatewayReceipt, Order, OrderId, OrderRequest, OrderStatus, OrderUpdate};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::services::{OrderService, PaymentVerifier, ServiceError};
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Debug)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .into_entity_error::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, request), fields(pincode = %request.pincode, method = ?request.payment_method))]
    pub async fn place(&self, request: OrderRequest) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        self.inner.create(request).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn attach_gateway_order(
        &self,
        id: OrderId,
        gateway_order_id: String,
    ) -> Result<(), OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, OrderAction::AttachGatewayOrder(gateway_order_id))
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, receipt), fields(gateway_order_id = %receipt.gateway_order_id))]
    pub async fn verify(&self, id: OrderId, receipt: GatewayReceipt) -> Result<(), OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, OrderAction::VerifyPayment(receipt))
            .await
        {
            Ok(OrderActionResult::PaymentVerified) => Ok(()),
            Ok(other) => Err(OrderError::ActorCommunicationError(format!(
                "unexpected result {other:?}"
            ))),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(id, OrderUpdate { order_status: status })
            .await
            .map_err(Self::map_error)
    }

    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        self.update_status(id, OrderStatus::Cancelled).await
    }
}

#[async_trait]
impl OrderService for OrderClient {
    async fn create_order(&self, request: OrderRequest) -> Result<OrderId, ServiceError> {
        let id = self.place(request).await?;
        info!(order_id = %id, "Order created");
        Ok(id)
    }
}

#[async_trait]
impl PaymentVerifier for OrderClient {
    async fn verify_payment(
        &self,
        receipt: &GatewayReceipt,
        order_id: OrderId,
    ) -> Result<(), ServiceError> {
        self.verify(order_id, receipt.clone()).await.map_err(|e| {
            warn!(%order_id, error = %e, "Payment verification rejected");
            ServiceError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CartLine, DeliveryAddress, PaymentMethod};
    use resource_actor::mock::{create_mock_client, expect_create, MockClient};
    use rust_decimal::Decimal;

    fn request() -> OrderRequest {
        OrderRequest {
            lines: vec![CartLine::new("hoodie", "Hoodie", "M", 2, Decimal::from(999))],
            payment_method: PaymentMethod::PayOnDelivery,
            delivery_address: DeliveryAddress {
                name: "Asha".into(),
                phone: "9876543210".into(),
                line1: "12 MG Road".into(),
                line2: None,
                city: "Pune".into(),
                state: "MH".into(),
            },
            pincode: "411001".parse().unwrap(),
            gateway_order_id: None,
            expected_total: None,
        }
    }

    #[tokio::test]
    async fn test_create_order_forwards_request() {
        let (client, mut receiver) = create_mock_client::<Order>(4);
        let client = OrderClient::new(client);

        let handle = tokio::spawn(async move { client.create_order(request()).await });

        let (params, respond_to) = expect_create(&mut receiver).await.unwrap();
        assert_eq!(params, request());
        respond_to.send(Ok(OrderId(7))).unwrap();

        assert_eq!(handle.await.unwrap().unwrap(), OrderId(7));
    }

    #[tokio::test]
    async fn test_order_errors_become_service_errors() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_create().return_err(FrameworkError::EntityError(Box::new(
            OrderError::PayOnDeliveryUnavailable,
        )));
        mock.expect_action(OrderId(1))
            .return_err(FrameworkError::EntityError(Box::new(OrderError::InvalidSignature)));
        mock.expect_action(OrderId(1)).return_err(FrameworkError::ActorClosed);
        let client = OrderClient::new(mock.client());

        assert_eq!(
            client.create_order(request()).await.unwrap_err(),
            ServiceError::rejected("COD not available for this pincode")
        );

        let receipt = GatewayReceipt {
            gateway_order_id: "order_sim_1".into(),
            gateway_payment_id: "pay_1".into(),
            signature: "00".into(),
        };
        assert!(matches!(
            client.verify_payment(&receipt, OrderId(1)).await,
            Err(ServiceError::VerificationFailed { .. })
        ));
        assert_eq!(
            client.verify_payment(&receipt, OrderId(1)).await.unwrap_err(),
            ServiceError::Unavailable
        );
        mock.verify();
    }
}

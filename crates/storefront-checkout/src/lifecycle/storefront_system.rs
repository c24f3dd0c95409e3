use crate::backend::{FixedTaxRate, PaymentSigner, PincodeDirectory, SimulatedGateway};
use crate::checkout::{CheckoutError, CheckoutSession};
use crate::clients::{CartClient, OrderClient};
use crate::config::{CheckoutConfig, ConfigError};
use crate::model::CartId;
use crate::order_actor::OrderContext;
use crate::services::CheckoutServices;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// The running storefront: cart and order actors plus the in-memory backend.
///
/// ```ignore
/// let system = StorefrontSystem::new(&CheckoutConfig::load()?)?;
/// let cart_id = system.cart_client.create_cart(lines).await?;
///
/// let session = system.checkout(cart_id).await?;
/// session.set_pincode("411001")?;
/// session.check_pincode().await?;
/// session.set_address(address)?;
/// session.place_order().await?;
///
/// drop(session);
/// system.shutdown().await?;
/// ```
pub struct StorefrontSystem {
    pub cart_client: CartClient,
    pub order_client: OrderClient,
    /// The simulated gateway, exposed so callers can script the customer's choices.
    pub gateway: Arc<SimulatedGateway>,
    services: CheckoutServices,
    config: CheckoutConfig,
    handles: Vec<JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Builds the backend and starts both actors. Must be called inside a Tokio runtime.
    pub fn new(config: &CheckoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let signer = PaymentSigner::new(&config.gateway_secret)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let pincodes = Arc::new(PincodeDirectory::new(config.pincodes.clone()));
        let tax_rates = Arc::new(FixedTaxRate(config.default_tax_rate_percent));
        let gateway = Arc::new(SimulatedGateway::new(config.currency.clone(), signer.clone()));

        // 1. Create actors
        let (cart_actor, carts) = crate::cart_actor::new(config.actor_buffer);
        let (order_actor, orders) = crate::order_actor::new(config.actor_buffer);
        let cart_client = CartClient::new(carts);
        let order_client = OrderClient::new(orders);

        // 2. Start actors with injected context
        let cart_handle = tokio::spawn(cart_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            pincodes: pincodes.clone(),
            tax_rates: tax_rates.clone(),
            policy: config.pricing_policy(),
            signer,
        }));

        let services = CheckoutServices {
            pincodes,
            orders: Arc::new(order_client.clone()),
            gateway: gateway.clone(),
            verifier: Arc::new(order_client.clone()),
            tax_rates,
            gateway_ui: gateway.clone(),
        };
        info!(pincodes = config.pincodes.len(), currency = %config.currency, "Storefront started");

        Ok(Self {
            cart_client,
            order_client,
            gateway,
            services,
            config: config.clone(),
            handles: vec![cart_handle, order_handle],
        })
    }

    /// Opens a checkout session for `cart_id`, locking the cart.
    pub async fn checkout(&self, cart_id: CartId) -> Result<CheckoutSession, CheckoutError> {
        CheckoutSession::open(
            self.services.clone(),
            self.cart_client.clone(),
            cart_id,
            self.config.pricing_policy(),
            self.config.default_tax_rate_percent,
        )
        .await
    }

    /// Drops every client held by the system and waits for the actors to stop.
    ///
    /// Sessions hold their own clients; drop them first or this waits forever.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down storefront...");
        drop(self.cart_client);
        drop(self.order_client);
        drop(self.services);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e);
            }
        }
        info!("Storefront shutdown complete.");
        Ok(())
    }
}

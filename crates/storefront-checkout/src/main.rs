//! Demo: one pay-on-delivery checkout and one gateway checkout that is
//! dismissed once before the customer pays.

use resource_actor::tracing::setup_tracing;
use resource_actor::ActorClient;
use rust_decimal::Decimal;
use storefront_checkout::backend::GatewayScript;
use storefront_checkout::checkout::{CheckoutSession, Placement};
use storefront_checkout::config::CheckoutConfig;
use storefront_checkout::lifecycle::StorefrontSystem;
use storefront_checkout::model::{CartLine, DeliveryAddress, PaymentMethod};
use tracing::{error, info, Instrument};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn address() -> DeliveryAddress {
    DeliveryAddress {
        name: "Asha Rao".to_string(),
        phone: "9876543210".to_string(),
        line1: "12 MG Road".to_string(),
        line2: Some("Flat 4B".to_string()),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
    }
}

async fn fill_in(session: &CheckoutSession, method: PaymentMethod) -> AppResult<()> {
    session.set_pincode("411001")?;
    let quote = session.check_pincode().await?;
    info!(shipping = %quote.shipping_charge, cod = quote.cod_available, "Delivery available");
    session.set_address(address())?;
    session.set_payment_method(method)?;

    let totals = session.totals().await?;
    info!(
        subtotal = %totals.subtotal,
        tax = %totals.tax,
        shipping = %totals.shipping,
        grand_total = %totals.grand_total,
        "Order summary"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = CheckoutConfig::load()?;
    let system = StorefrontSystem::new(&config)?;

    let hoodie = CartLine::new("hoodie", "Oversized Hoodie", "M", 2, Decimal::from(999));
    let tee = CartLine::new("tee", "Logo Tee", "L", 1, Decimal::from(499));

    // Pay on delivery
    let cart_id = system.cart_client.create_cart(vec![tee]).await?;
    let session = system.checkout(cart_id).await?;
    async {
        fill_in(&session, PaymentMethod::PayOnDelivery).await?;
        match session.place_order().await? {
            Placement::Completed(order_id) => info!(%order_id, "Order placed"),
            Placement::Dismissed(order_id) => info!(%order_id, "Order left unpaid"),
        }
        AppResult::Ok(())
    }
    .instrument(tracing::info_span!("cod_checkout", %cart_id))
    .await?;
    drop(session);

    // Gateway: the customer closes the payment window once, then pays.
    let cart_id = system.cart_client.create_cart(vec![hoodie]).await?;
    let session = system.checkout(cart_id).await?;
    let mut notices = session.subscribe_notices();
    system.gateway.push_script(GatewayScript::Dismiss);
    async {
        fill_in(&session, PaymentMethod::Gateway).await?;
        loop {
            match session.place_order().await {
                Ok(Placement::Completed(order_id)) => {
                    let order = system.order_client.get(order_id).await?;
                    info!(%order_id, confirmed = order.is_some_and(|o| o.is_confirmed()), "Order paid");
                    break;
                }
                Ok(Placement::Dismissed(order_id)) => info!(%order_id, "Retrying payment"),
                Err(e) => {
                    error!(error = %e, "Checkout failed");
                    break;
                }
            }
        }
        AppResult::Ok(())
    }
    .instrument(tracing::info_span!("gateway_checkout", %cart_id))
    .await?;

    while let Ok(notice) = notices.try_recv() {
        info!(%notice, "Notice");
    }
    drop(session);

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}

use resource_actor::{ActorClient, ResourceEvent};
use rust_decimal::Decimal;
use storefront_checkout::backend::GatewayScript;
use storefront_checkout::cart_actor::CartError;
use storefront_checkout::checkout::{CheckoutError, CheckoutState, Placement};
use storefront_checkout::config::CheckoutConfig;
use storefront_checkout::lifecycle::StorefrontSystem;
use storefront_checkout::model::{
    CartLine, DeliveryAddress, OrderStatus, PaymentMethod, PaymentStatus,
};
use storefront_checkout::services::ServiceError;

fn address() -> DeliveryAddress {
    DeliveryAddress {
        name: "Asha".to_string(),
        phone: "9876543210".to_string(),
        line1: "12 MG Road".to_string(),
        line2: None,
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
    }
}

fn hoodies() -> CartLine {
    CartLine::new("hoodie", "Oversized Hoodie", "M", 2, Decimal::from(999))
}

/// Full end-to-end test with the real actors and the simulated gateway.
#[tokio::test]
async fn test_gateway_checkout_end_to_end() {
    let system = StorefrontSystem::new(&CheckoutConfig::default()).expect("Failed to start");
    let cart_id = system
        .cart_client
        .create_cart(vec![hoodies()])
        .await
        .expect("Failed to create cart");

    let session = system.checkout(cart_id).await.expect("Failed to open checkout");
    session.set_pincode("411001").unwrap();
    session.check_pincode().await.unwrap();
    session.set_address(address()).unwrap();
    session.set_payment_method(PaymentMethod::Gateway).unwrap();

    let totals = session.totals().await.unwrap();
    assert_eq!(totals.subtotal, Decimal::from(1998));
    assert_eq!(totals.shipping, Decimal::ZERO);
    assert_eq!(totals.tax, Decimal::from(360));
    assert_eq!(totals.grand_total, Decimal::from(2358));

    let Placement::Completed(order_id) = session.place_order().await.unwrap() else {
        panic!("expected a completed placement");
    };
    assert_eq!(session.state(), CheckoutState::Completed { order_id });

    // The order store priced the order itself and confirmed the payment
    let order = system
        .order_client
        .get(order_id)
        .await
        .expect("Failed to get order")
        .expect("Order not found");
    assert_eq!(order.totals, totals);
    assert_eq!(order.quoted_total, Some(totals.grand_total));
    assert_eq!(order.payment_status, PaymentStatus::Success);
    assert_eq!(order.order_status, OrderStatus::Confirmed);
    assert!(order.gateway_payment_id.is_some());

    // The cart was cleared and unlocked
    let cart = system.cart_client.snapshot(cart_id).await.unwrap();
    assert!(cart.is_empty());
    assert!(!cart.checkout_locked);

    drop(session);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_pay_on_delivery_confirms_immediately() {
    let system = StorefrontSystem::new(&CheckoutConfig::default()).unwrap();
    let cart_id = system.cart_client.create_cart(vec![hoodies()]).await.unwrap();

    let session = system.checkout(cart_id).await.unwrap();
    session.set_pincode("400001").unwrap();
    session.check_pincode().await.unwrap();
    session.set_address(address()).unwrap();
    session.set_payment_method(PaymentMethod::PayOnDelivery).unwrap();

    let Placement::Completed(order_id) = session.place_order().await.unwrap() else {
        panic!("expected a completed placement");
    };
    let order = system.order_client.get(order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::Confirmed);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.gateway_order_id, None);

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_forged_receipt_leaves_order_unpaid_and_cart_intact() {
    let system = StorefrontSystem::new(&CheckoutConfig::default()).unwrap();
    let cart_id = system.cart_client.create_cart(vec![hoodies()]).await.unwrap();
    system.gateway.push_script(GatewayScript::ForgeSignature);

    let session = system.checkout(cart_id).await.unwrap();
    session.set_pincode("411001").unwrap();
    let quote = session.check_pincode().await.unwrap();
    session.set_address(address()).unwrap();

    let err = session.place_order().await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Service(ServiceError::VerificationFailed { .. })
    ));
    let CheckoutState::Error { resume, .. } = session.state() else {
        panic!("expected an error state");
    };
    assert_eq!(*resume, CheckoutState::QuoteKnown { quote });

    let cart = system.cart_client.snapshot(cart_id).await.unwrap();
    assert_eq!(cart.lines, vec![hoodies()]);

    // Retrying places a fresh order, which the customer pays this time
    let Placement::Completed(paid) = session.place_order().await.unwrap() else {
        panic!("expected a completed placement");
    };
    let failed = storefront_checkout::model::OrderId(paid.0 - 1);
    let unpaid = system.order_client.get(failed).await.unwrap().unwrap();
    assert_eq!(unpaid.payment_status, PaymentStatus::Failed);
    assert_eq!(unpaid.order_status, OrderStatus::Pending);

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cod_refused_where_not_offered() {
    let system = StorefrontSystem::new(&CheckoutConfig::default()).unwrap();
    let cart_id = system.cart_client.create_cart(vec![hoodies()]).await.unwrap();

    let session = system.checkout(cart_id).await.unwrap();
    session.set_pincode("110001").unwrap();
    session.check_pincode().await.unwrap();
    session.set_address(address()).unwrap();
    session.set_payment_method(PaymentMethod::PayOnDelivery).unwrap();

    assert_eq!(
        session.place_order().await.unwrap_err(),
        CheckoutError::PayOnDeliveryUnavailable
    );
    assert!(system.cart_client.snapshot(cart_id).await.unwrap().checkout_locked);

    session.close().await.unwrap();
    assert!(!system.cart_client.snapshot(cart_id).await.unwrap().checkout_locked);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cart_changes_are_published() {
    let system = StorefrontSystem::new(&CheckoutConfig::default()).unwrap();
    let mut changes = system.cart_client.subscribe();

    let cart_id = system.cart_client.create_cart(Vec::new()).await.unwrap();
    system.cart_client.add_line(cart_id, hoodies()).await.unwrap();
    system
        .cart_client
        .set_quantity(cart_id, "hoodie".into(), "M", 3)
        .await
        .unwrap();

    assert_eq!(changes.recv().await.unwrap(), ResourceEvent::Created(cart_id));
    assert_eq!(changes.recv().await.unwrap(), ResourceEvent::ActionApplied(cart_id));
    assert_eq!(changes.recv().await.unwrap(), ResourceEvent::ActionApplied(cart_id));
    assert_eq!(system.cart_client.snapshot(cart_id).await.unwrap().item_count(), 3);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_dropped_checkout_unlocks_cart() {
    let system = StorefrontSystem::new(&CheckoutConfig::default()).unwrap();
    let cart_id = system.cart_client.create_cart(vec![hoodies()]).await.unwrap();
    let session = system.checkout(cart_id).await.unwrap();
    let mut changes = system.cart_client.subscribe();

    drop(session);
    assert_eq!(changes.recv().await.unwrap(), ResourceEvent::ActionApplied(cart_id));

    let cap = CartLine::new("cap", "Dad Cap", "Free", 1, Decimal::from(399));
    system.cart_client.add_line(cart_id, cap).await.unwrap();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_quantity_overflow_is_rejected_and_other_carts_keep_working() {
    let system = StorefrontSystem::new(&CheckoutConfig::default()).unwrap();
    let first = system.cart_client.create_cart(vec![hoodies()]).await.unwrap();
    let second = system.cart_client.create_cart(Vec::new()).await.unwrap();

    let mut too_many = hoodies();
    too_many.quantity = u32::MAX;
    assert!(matches!(
        system.cart_client.add_line(first, too_many).await.unwrap_err(),
        CartError::InvalidQuantity { .. }
    ));
    assert_eq!(system.cart_client.snapshot(first).await.unwrap().item_count(), 2);

    system.cart_client.add_line(second, hoodies()).await.unwrap();
    system.shutdown().await.unwrap();
}

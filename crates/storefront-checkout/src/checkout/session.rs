use super::{CheckoutState, Notice};
use crate::cart_actor::CartError;
use crate::clients::CartClient;
use crate::model::{
    CartId, CartLine, DeliveryAddress, DeliveryQuote, GatewayOutcome, OrderId, OrderRequest,
    PaymentMethod, Pincode, ValidationError,
};
use crate::pricing::{OrderTotals, PricingError, PricingPolicy};
use crate::services::{CheckoutServices, ServiceError};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

const NOTICE_CAPACITY: usize = 32;
const RETRY_PROMPT: &str = "Please try again";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Enter a pincode first")]
    NoPincode,

    #[error("Check delivery for this pincode before placing the order")]
    NoDeliveryQuote,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("COD not available for this pincode")]
    PayOnDeliveryUnavailable,

    #[error("An order is already being placed")]
    PlacementInFlight,

    #[error("Delivery check already in progress")]
    QuoteCheckInFlight,

    #[error("Checkout is already complete")]
    Completed,

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// How a placement that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The order is confirmed and the cart has been cleared.
    Completed(OrderId),
    /// The customer closed the payment UI; the order stays unpaid.
    Dismissed(OrderId),
}

#[derive(Debug, Default)]
struct CheckoutForm {
    pincode: Option<Pincode>,
    quote: Option<DeliveryQuote>,
    address: DeliveryAddress,
    payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// The cached quote, if it answers for the entered pincode.
    fn current_quote(&self) -> Option<&DeliveryQuote> {
        let pincode = self.pincode.as_ref()?;
        self.quote.as_ref().filter(|quote| quote.is_for(pincode))
    }

    fn resting_state(&self) -> CheckoutState {
        match self.current_quote() {
            Some(quote) => CheckoutState::QuoteKnown {
                quote: quote.clone(),
            },
            None => CheckoutState::Idle,
        }
    }
}

/// One customer's pass through checkout for one cart.
///
/// Totals are never cached: [`CheckoutSession::totals`] reads the cart and the
/// quote each time. Every operation takes `&self`; at most one quote check or
/// placement runs at a time and a second one is refused without touching any
/// service.
///
/// Dropping the session releases the cart in the background, as
/// [`CheckoutSession::close`] would.
pub struct CheckoutSession {
    services: CheckoutServices,
    carts: CartClient,
    cart_id: CartId,
    policy: PricingPolicy,
    tax_rate: Decimal,
    form: Mutex<CheckoutForm>,
    state: watch::Sender<CheckoutState>,
    notices: broadcast::Sender<Notice>,
    // Holds notices published before anyone subscribed (e.g. from `open`).
    first_notices: Mutex<Option<broadcast::Receiver<Notice>>>,
    // Set once the cart is unlocked, or cleared after a confirmed order.
    cart_released: AtomicBool,
}

impl std::fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("cart_id", &self.cart_id)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl CheckoutSession {
    /// Locks the cart for checkout and fetches the tax rate.
    ///
    /// If the tax rate cannot be fetched `default_tax_rate` is used and a
    /// warning notice is queued for the first notice subscriber.
    #[instrument(skip(services, carts, policy))]
    pub async fn open(
        services: CheckoutServices,
        carts: CartClient,
        cart_id: CartId,
        policy: PricingPolicy,
        default_tax_rate: Decimal,
    ) -> Result<Self, CheckoutError> {
        let lines = carts.begin_checkout(cart_id).await?;
        let (notices, first) = broadcast::channel(NOTICE_CAPACITY);

        let tax_rate = match services.tax_rates.tax_rate_percent().await {
            Ok(rate) => rate,
            Err(e) => {
                warn!(error = %e, fallback = %default_tax_rate, "Tax rate unavailable");
                let _ = notices.send(Notice::warning(format!(
                    "Using default tax rate of {default_tax_rate}%"
                )));
                default_tax_rate
            }
        };
        info!(lines = lines.len(), %tax_rate, "Checkout opened");

        let (state, _) = watch::channel(CheckoutState::Idle);
        Ok(Self {
            services,
            carts,
            cart_id,
            policy,
            tax_rate,
            form: Mutex::new(CheckoutForm::default()),
            state,
            notices,
            first_notices: Mutex::new(Some(first)),
            cart_released: AtomicBool::new(false),
        })
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn tax_rate_percent(&self) -> Decimal {
        self.tax_rate
    }

    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.lock_first_notices()
            .take()
            .unwrap_or_else(|| self.notices.subscribe())
    }

    /// Sets the delivery pincode. A different pincode discards the cached quote.
    pub fn set_pincode(&self, raw: &str) -> Result<(), CheckoutError> {
        let pincode: Pincode = raw.parse()?;
        let mut refused = None;
        self.state.send_if_modified(|state| {
            if let Some(e) = refuse_input(state) {
                refused = Some(e);
                return false;
            }
            let mut form = self.lock_form();
            if form.pincode.as_ref() == Some(&pincode) {
                return false;
            }
            debug!(%pincode, "Pincode changed");
            form.pincode = Some(pincode.clone());
            form.quote = None;
            *state = CheckoutState::Idle;
            true
        });
        refused.map_or(Ok(()), Err)
    }

    pub fn set_address(&self, address: DeliveryAddress) -> Result<(), CheckoutError> {
        self.ensure_not_completed()?;
        self.lock_form().address = address;
        Ok(())
    }

    pub fn set_payment_method(&self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.ensure_not_completed()?;
        self.lock_form().payment_method = method;
        Ok(())
    }

    /// The cached quote for the entered pincode.
    pub fn quote(&self) -> Option<DeliveryQuote> {
        self.lock_form().current_quote().cloned()
    }

    /// Whether a placement could start now.
    pub fn can_place_order(&self) -> bool {
        let state = self.state.borrow();
        !state.is_in_flight() && !state.is_completed()
    }

    /// Recomputes the totals from the current cart and quote.
    pub async fn totals(&self) -> Result<OrderTotals, CheckoutError> {
        let lines = self.carts.snapshot(self.cart_id).await?.lines;
        Ok(self.totals_for(&lines, self.quote().as_ref())?)
    }

    fn totals_for(
        &self,
        lines: &[CartLine],
        quote: Option<&DeliveryQuote>,
    ) -> Result<OrderTotals, PricingError> {
        OrderTotals::compute(lines, self.tax_rate, quote, &self.policy)
    }

    /// Fetches the delivery quote for the entered pincode.
    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn check_pincode(&self) -> Result<DeliveryQuote, CheckoutError> {
        let pincode = self.lock_form().pincode.clone().ok_or(CheckoutError::NoPincode)?;
        let mut step = self.start(CheckoutState::QuoteChecking)?;

        match self.services.pincodes.lookup(&pincode).await {
            Ok(quote) => {
                let mut form = self.lock_form();
                if form.pincode.as_ref() == Some(&pincode) {
                    form.quote = Some(quote.clone());
                }
                let resting = form.resting_state();
                drop(form);
                info!(%pincode, cod = quote.cod_available, "Delivery quote received");
                step.finish(resting);
                Ok(quote)
            }
            Err(e) => {
                if matches!(e, ServiceError::NotServiceable(_)) {
                    self.lock_form().quote = None;
                }
                Err(self.fail(&mut step, e, "Unable to check delivery for this pincode"))
            }
        }
    }

    /// Places the order through the selected payment method.
    ///
    /// Nothing is sent to any service unless the cart has lines, the entered
    /// pincode has a quote, the address is complete and, for pay on delivery,
    /// the quote allows it.
    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn place_order(&self) -> Result<Placement, CheckoutError> {
        let mut step = self.start(CheckoutState::PlacingOrder)?;

        let (request, totals) = match self.prepare().await {
            Ok(prepared) => prepared,
            Err(e) => {
                let message = e.to_string();
                self.notify(Notice::error(message.clone()));
                step.finish(CheckoutState::error(message, step.resume.clone()));
                return Err(e);
            }
        };

        match request.payment_method {
            PaymentMethod::PayOnDelivery => self.place_on_delivery(&mut step, request).await,
            PaymentMethod::Gateway => self.place_with_gateway(&mut step, request, &totals).await,
        }
    }

    /// Ends checkout and releases the cart.
    ///
    /// An abandoned checkout unlocks the cart. After a confirmed order whose
    /// cart could not be cleared, the clear is retried here.
    pub async fn close(self) -> Result<(), CheckoutError> {
        if self.cart_released.load(Ordering::SeqCst) {
            return Ok(());
        }
        let completed = self.state.borrow().is_completed();
        release_cart(&self.carts, self.cart_id, completed).await?;
        self.cart_released.store(true, Ordering::SeqCst);
        info!(cart_id = %self.cart_id, completed, "Checkout closed");
        Ok(())
    }

    async fn prepare(&self) -> Result<(OrderRequest, OrderTotals), CheckoutError> {
        let lines = self.carts.snapshot(self.cart_id).await?.lines;
        let form = self.lock_form();

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let pincode = form.pincode.clone().ok_or(CheckoutError::NoPincode)?;
        let quote = form
            .current_quote()
            .cloned()
            .ok_or(CheckoutError::NoDeliveryQuote)?;
        form.address.validate()?;
        if form.payment_method == PaymentMethod::PayOnDelivery && !quote.cod_available {
            return Err(CheckoutError::PayOnDeliveryUnavailable);
        }

        let totals = self.totals_for(&lines, Some(&quote))?;

        let request = OrderRequest {
            lines,
            payment_method: form.payment_method,
            delivery_address: form.address.clone(),
            pincode,
            gateway_order_id: None,
            expected_total: Some(totals.grand_total),
        };
        Ok((request, totals))
    }

    async fn place_on_delivery(
        &self,
        step: &mut InFlight<'_>,
        request: OrderRequest,
    ) -> Result<Placement, CheckoutError> {
        let order_id = match self.services.orders.create_order(request).await {
            Ok(id) => id,
            Err(e) => return Err(self.fail(step, e, "Failed to place order")),
        };
        self.complete(step, order_id).await;
        self.notify(Notice::info("Order placed. Pay on delivery."));
        Ok(Placement::Completed(order_id))
    }

    async fn place_with_gateway(
        &self,
        step: &mut InFlight<'_>,
        mut request: OrderRequest,
        totals: &OrderTotals,
    ) -> Result<Placement, CheckoutError> {
        let amount_minor = match totals.amount_in_minor_units(&self.policy) {
            Ok(amount) => amount,
            Err(e) => {
                let e = CheckoutError::from(e);
                let message = e.to_string();
                self.notify(Notice::error(message.clone()));
                step.finish(CheckoutState::error(message, step.resume.clone()));
                return Err(e);
            }
        };

        let handle = match self.services.gateway.create_gateway_order(amount_minor).await {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail(step, e, "Unable to start payment")),
        };
        request.gateway_order_id = Some(handle.gateway_order_id.clone());

        let order_id = match self.services.orders.create_order(request).await {
            Ok(id) => id,
            Err(e) => return Err(self.fail(step, e, "Failed to place order")),
        };
        step.advance(CheckoutState::AwaitingGatewayConfirmation {
            order_id,
            handle: handle.clone(),
        });

        match self.services.gateway_ui.present(&handle, order_id).await {
            GatewayOutcome::Paid(receipt) => {
                step.advance(CheckoutState::Verifying { order_id });
                if let Err(e) = self.services.verifier.verify_payment(&receipt, order_id).await {
                    let message = match e.server_message() {
                        Some(reason) => format!("{}. {RETRY_PROMPT}", reason.trim_end_matches('.')),
                        None => format!("Payment verification failed. {RETRY_PROMPT}"),
                    };
                    return Err(self.report(step, e, message));
                }
                self.complete(step, order_id).await;
                self.notify(Notice::info("Payment successful. Order confirmed."));
                Ok(Placement::Completed(order_id))
            }
            GatewayOutcome::Dismissed => {
                info!(%order_id, "Payment dismissed");
                let resting = self.lock_form().resting_state();
                step.finish(resting);
                self.notify(Notice::info("Payment cancelled"));
                Ok(Placement::Dismissed(order_id))
            }
            GatewayOutcome::Failed(reason) => {
                warn!(%order_id, %reason, "Payment failed");
                let e = CheckoutError::PaymentFailed(reason);
                let message = e.to_string();
                self.notify(Notice::error(message.clone()));
                step.finish(CheckoutState::error(message, step.resume.clone()));
                Err(e)
            }
        }
    }

    /// Clears the cart and enters `Completed`. The order already exists, so a
    /// failure to clear the cart is only logged.
    async fn complete(&self, step: &mut InFlight<'_>, order_id: OrderId) {
        match self.carts.clear(self.cart_id).await {
            Ok(()) => self.cart_released.store(true, Ordering::SeqCst),
            Err(e) => warn!(%order_id, error = %e, "Failed to clear cart after order"),
        }
        info!(%order_id, "Checkout completed");
        step.finish(CheckoutState::Completed { order_id });
    }

    /// Reports a service failure: an error notice with the server's message
    /// (or `fallback`) and an `Error` state resuming where the step started.
    fn fail(&self, step: &mut InFlight<'_>, e: ServiceError, fallback: &str) -> CheckoutError {
        let message = e.server_message().unwrap_or_else(|| fallback.to_string());
        self.report(step, e, message)
    }

    fn report(&self, step: &mut InFlight<'_>, e: ServiceError, message: String) -> CheckoutError {
        warn!(error = %e, "Checkout step failed");
        self.notify(Notice::error(message.clone()));
        let resume = self.lock_form().resting_state();
        step.finish(CheckoutState::error(message, resume));
        CheckoutError::Service(e)
    }

    fn notify(&self, notice: Notice) {
        let _ = self.notices.send(notice);
    }

    /// Atomically moves from a stable state into `next`.
    fn start(&self, next: CheckoutState) -> Result<InFlight<'_>, CheckoutError> {
        let mut outcome = Err(CheckoutError::Completed);
        self.state.send_if_modified(|state| {
            if let Some(e) = refuse_input(state) {
                outcome = Err(e);
                return false;
            }
            let resume = std::mem::replace(state, next.clone()).resting();
            outcome = Ok(resume);
            true
        });
        let resume = outcome?;
        Ok(InFlight {
            state: &self.state,
            resume,
            armed: true,
        })
    }

    fn ensure_not_completed(&self) -> Result<(), CheckoutError> {
        if self.state.borrow().is_completed() {
            return Err(CheckoutError::Completed);
        }
        Ok(())
    }

    fn lock_form(&self) -> std::sync::MutexGuard<'_, CheckoutForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_first_notices(&self) -> std::sync::MutexGuard<'_, Option<broadcast::Receiver<Notice>>> {
        self.first_notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CheckoutSession {
    fn drop(&mut self) {
        if self.cart_released.load(Ordering::SeqCst) {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(cart_id = %self.cart_id, "Checkout dropped outside a runtime, cart stays locked");
            return;
        };
        let carts = self.carts.clone();
        let cart_id = self.cart_id;
        let completed = self.state.borrow().is_completed();
        runtime.spawn(async move {
            match release_cart(&carts, cart_id, completed).await {
                Ok(()) => debug!(%cart_id, "Cart released after checkout was dropped"),
                Err(e) => warn!(%cart_id, error = %e, "Failed to release cart"),
            }
        });
    }
}

/// Unlocks the cart. After a confirmed order its lines are cleared as well.
async fn release_cart(carts: &CartClient, cart_id: CartId, completed: bool) -> Result<(), CartError> {
    if completed {
        carts.clear(cart_id).await
    } else {
        carts.end_checkout(cart_id).await
    }
}

/// Why `state` cannot accept a new operation, if it cannot.
fn refuse_input(state: &CheckoutState) -> Option<CheckoutError> {
    match state {
        CheckoutState::Completed { .. } => Some(CheckoutError::Completed),
        CheckoutState::QuoteChecking => Some(CheckoutError::QuoteCheckInFlight),
        s if s.is_in_flight() => Some(CheckoutError::PlacementInFlight),
        _ => None,
    }
}

/// An operation in progress. If it is dropped before finishing (the caller
/// stopped polling), the session returns to the state the operation started from.
struct InFlight<'a> {
    state: &'a watch::Sender<CheckoutState>,
    resume: CheckoutState,
    armed: bool,
}

impl InFlight<'_> {
    fn advance(&mut self, next: CheckoutState) {
        self.state.send_replace(next);
    }

    fn finish(&mut self, last: CheckoutState) {
        self.armed = false;
        self.state.send_replace(last);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(resume = ?self.resume, "Checkout step abandoned");
            self.state.send_replace(self.resume.clone());
        }
    }
}

//! Checkout sequencer: order creation, payment confirmation, finalization.
//!
//! A strict, non-resumable linear state machine:
//!
//! ```text
//! Idle -> OrderCreated -> PaymentConfirmedRemotely
//!      -> PaymentConfirmedOnBackend -> CartCleared
//! ```
//!
//! `Failed` is reachable from every non-terminal state; a failed attempt
//! surfaces one notification and resets the sequencer to `Idle` with no
//! partial state retained. Clearing the cart is the only transition that
//! mutates any other store, and the created order is never compensated
//! client-side - reconciliation after a processor failure is a backend
//! concern.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use copperleaf_core::OrderId;

use crate::api::ApiClient;
use crate::error::StoreError;
use crate::notify::SharedNotifier;
use crate::payment::{CardDetails, PaymentError, PaymentGateway};
use crate::services::cart::CartStore;
use crate::services::session::SessionStore;

/// Errors raised by the checkout guards and setup steps.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout requires a signed-in session.
    #[error("Sign in to check out")]
    NotAuthenticated,

    /// Checkout requires a non-empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A shipping address is required before any network call is made.
    #[error("Please enter your shipping address")]
    MissingAddress,

    /// The backend did not return a payable order (missing payment intent
    /// or client secret). Aborts before any money moves.
    #[error("{0}")]
    PaymentSetup(String),
}

/// Observable position in the checkout state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    OrderCreated,
    PaymentConfirmedRemotely,
    PaymentConfirmedOnBackend,
    CartCleared,
    Failed,
}

/// Outcome of a completed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
}

/// One-shot coordinator for a checkout attempt.
pub struct CheckoutSequencer<G> {
    api: ApiClient,
    session: Arc<SessionStore>,
    cart: Arc<CartStore>,
    gateway: G,
    notifier: SharedNotifier,
    state: RwLock<CheckoutState>,
}

impl<G: PaymentGateway> CheckoutSequencer<G> {
    /// Create a sequencer in the `Idle` state.
    #[must_use]
    pub fn new(
        api: ApiClient,
        session: Arc<SessionStore>,
        cart: Arc<CartStore>,
        gateway: G,
        notifier: SharedNotifier,
    ) -> Self {
        Self {
            api,
            session,
            cart,
            gateway,
            notifier,
            state: RwLock::new(CheckoutState::Idle),
        }
    }

    /// The sequencer's current state. Outside a running attempt this is
    /// always `Idle`: the checkout session is ephemeral and discarded on
    /// success and failure alike.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        *self
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Run one checkout attempt end to end.
    ///
    /// # Errors
    ///
    /// Any step's failure is converted to a single user-facing
    /// notification, the sequencer resets to `Idle`, and the error is
    /// returned for the caller to abort its own flow.
    pub async fn place_order(
        &self,
        shipping_address: &str,
        card: &CardDetails,
    ) -> Result<CheckoutReceipt, StoreError> {
        // Guards: refuse before any network call.
        if !self.session.is_authenticated() {
            return self.fail(CheckoutError::NotAuthenticated.into());
        }
        if self.cart.is_empty() {
            return self.fail(CheckoutError::EmptyCart.into());
        }
        if shipping_address.trim().is_empty() {
            return self.fail(CheckoutError::MissingAddress.into());
        }

        match self.run(shipping_address, card).await {
            Ok(receipt) => {
                self.notifier.success("Payment successful! Order confirmed.");
                // Discard the checkout session; the next attempt starts fresh.
                self.transition(CheckoutState::Idle);
                Ok(receipt)
            }
            Err(err) => self.fail(err),
        }
    }

    async fn run(
        &self,
        shipping_address: &str,
        card: &CardDetails,
    ) -> Result<CheckoutReceipt, StoreError> {
        // 1. Create the order. It must come back payable.
        let order = self.api.create_order(shipping_address).await?;
        if order.stripe_payment_intent_id.is_empty() {
            return Err(CheckoutError::PaymentSetup("Payment intent not created".to_string()).into());
        }
        let Some(client_secret) = order.client_secret.clone() else {
            return Err(
                CheckoutError::PaymentSetup("Client secret not available".to_string()).into(),
            );
        };
        self.transition(CheckoutState::OrderCreated);

        // 2. Confirm with the processor. On failure the order stays in
        //    place server-side.
        let confirmation = self
            .gateway
            .confirm_card_payment(&client_secret, card)
            .await
            .map_err(StoreError::Payment)?;

        // 3. Anything short of an explicit success is a failure, even
        //    without an error from the processor.
        if !confirmation.status.succeeded() {
            return Err(PaymentError::Incomplete(confirmation.status).into());
        }
        self.transition(CheckoutState::PaymentConfirmedRemotely);

        // 4. Tell the backend.
        self.api.confirm_payment(order.id).await?;
        self.transition(CheckoutState::PaymentConfirmedOnBackend);

        // 5. The only transition that mutates the cart.
        self.cart.clear().await?;
        self.transition(CheckoutState::CartCleared);

        Ok(CheckoutReceipt { order_id: order.id })
    }

    fn fail(&self, err: StoreError) -> Result<CheckoutReceipt, StoreError> {
        let event_id = sentry::capture_error(&err);
        tracing::error!(
            error = %err,
            state = ?self.state(),
            sentry_event_id = %event_id,
            "checkout failed"
        );

        self.transition(CheckoutState::Failed);
        self.notifier.error(&err.user_message("Checkout failed"));
        // No partial state survives a failed attempt.
        self.transition(CheckoutState::Idle);
        Err(err)
    }

    fn transition(&self, next: CheckoutState) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        tracing::debug!(from = ?*state, to = ?next, "checkout transition");
        *state = next;
    }
}

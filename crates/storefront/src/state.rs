//! Application state shared across the front end.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{FileTokenStore, TokenStore};
use crate::config::StoreConfig;
use crate::notify::{Notifier, SharedNotifier, TracingNotifier};
use crate::payment::{PaymentGateway, StripeGateway};
use crate::services::{CartStore, CheckoutSequencer, SessionStore};

/// Application state wiring configuration, the API client, and the stores.
///
/// This struct is cheaply cloneable via `Arc`. Stores are constructed here
/// with explicit dependencies - there are no ambient singletons, so tests
/// can build the same graph around injected fakes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StoreConfig,
    api: ApiClient,
    session: Arc<SessionStore>,
    cart: Arc<CartStore>,
    notifier: SharedNotifier,
}

impl AppState {
    /// Create application state with file-backed token persistence and the
    /// default notifier.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(config.token_file.clone()));
        Self::with_parts(config, tokens, Arc::new(TracingNotifier))
    }

    /// Create application state with a custom notifier (the CLI installs a
    /// terminal one).
    #[must_use]
    pub fn with_notifier(config: StoreConfig, notifier: Arc<dyn Notifier>) -> Self {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(config.token_file.clone()));
        Self::with_parts(config, tokens, notifier)
    }

    /// Create application state from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: StoreConfig,
        tokens: Arc<dyn TokenStore>,
        notifier: SharedNotifier,
    ) -> Self {
        let api = ApiClient::new(config.api_base_url.clone(), tokens.clone());
        let session = Arc::new(SessionStore::new(api.clone(), tokens, notifier.clone()));
        let cart = Arc::new(CartStore::new(api.clone(), notifier.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                session,
                cart,
                notifier,
            }),
        }
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get the session store.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    /// Get the cart store.
    #[must_use]
    pub fn cart(&self) -> &Arc<CartStore> {
        &self.inner.cart
    }

    /// Build a checkout sequencer over the given payment gateway.
    #[must_use]
    pub fn checkout<G: PaymentGateway>(&self, gateway: G) -> CheckoutSequencer<G> {
        CheckoutSequencer::new(
            self.inner.api.clone(),
            self.inner.session.clone(),
            self.inner.cart.clone(),
            gateway,
            self.inner.notifier.clone(),
        )
    }

    /// Build a checkout sequencer over the configured Stripe gateway.
    #[must_use]
    pub fn stripe_checkout(&self) -> CheckoutSequencer<StripeGateway> {
        self.checkout(StripeGateway::new(
            self.inner.config.payment_publishable_key.clone(),
        ))
    }
}

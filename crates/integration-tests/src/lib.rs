//! Test harness for the storefront client.
//!
//! Provides a mock store backend (`wiremock`), an unsigned-JWT builder
//! matching what the real backend issues, a recording notifier standing in
//! for the toast rail, and a scripted payment gateway.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use wiremock::MockServer;

use copperleaf_storefront::api::ApiClient;
use copperleaf_storefront::auth::MemoryTokenStore;
use copperleaf_storefront::notify::Notifier;
use copperleaf_storefront::payment::{
    CardDetails, PaymentConfirmation, PaymentError, PaymentGateway, PaymentIntentStatus,
};
use copperleaf_storefront::services::{CartStore, CheckoutSequencer, SessionStore};

// =============================================================================
// Token fixtures
// =============================================================================

/// Build an access token whose payload decodes like the backend's JWTs.
/// The signature is junk - the client never verifies it.
#[must_use]
pub fn access_token(user_id: i64, username: &str, email: &str) -> String {
    access_token_with_names(user_id, username, email, "", "")
}

/// As [`access_token`], with first/last name claims.
#[must_use]
pub fn access_token_with_names(
    user_id: i64,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = serde_json::json!({
        "token_type": "access",
        "user_id": user_id,
        "username": username,
        "email": email,
        "first_name": first_name,
        "last_name": last_name,
        "exp": 4_102_444_800_i64,
    });
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&payload).unwrap_or_default(),
    );
    format!("{header}.{payload}.junk-signature")
}

// =============================================================================
// RecordingNotifier
// =============================================================================

/// Notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Records notifications instead of displaying them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices in the order they were surfaced.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Success messages only.
    #[must_use]
    pub fn successes(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Success(message) => Some(message),
                Notice::Error(_) => None,
            })
            .collect()
    }

    /// Error messages only.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Error(message) => Some(message),
                Notice::Success(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice::Error(message.to_string()));
    }
}

// =============================================================================
// FakeGateway
// =============================================================================

#[derive(Debug, Clone)]
enum GatewayScript {
    Succeed,
    Decline(String),
    Status(&'static str),
}

/// Scripted payment gateway recording every confirmation attempt.
#[derive(Clone)]
pub struct FakeGateway {
    script: GatewayScript,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeGateway {
    /// A gateway that confirms every payment.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::with_script(GatewayScript::Succeed)
    }

    /// A gateway that declines with the given processor message.
    #[must_use]
    pub fn declining(message: &str) -> Self {
        Self::with_script(GatewayScript::Decline(message.to_string()))
    }

    /// A gateway that answers without an error but with the given
    /// non-success status.
    #[must_use]
    pub fn with_status(status: &'static str) -> Self {
        Self::with_script(GatewayScript::Status(status))
    }

    fn with_script(script: GatewayScript) -> Self {
        Self {
            script,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Client secrets submitted so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PaymentGateway for FakeGateway {
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        _card: &CardDetails,
    ) -> Result<PaymentConfirmation, PaymentError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(client_secret.to_string());

        match &self.script {
            GatewayScript::Succeed => Ok(PaymentConfirmation {
                payment_intent: "pi_fake".to_string(),
                status: PaymentIntentStatus::Succeeded,
            }),
            GatewayScript::Decline(message) => Err(PaymentError::Declined(message.clone())),
            GatewayScript::Status(status) => Ok(PaymentConfirmation {
                payment_intent: "pi_fake".to_string(),
                status: PaymentIntentStatus::from(*status),
            }),
        }
    }
}

// =============================================================================
// TestStore
// =============================================================================

/// A full client stack wired to a mock backend.
pub struct TestStore {
    pub server: MockServer,
    pub api: ApiClient,
    pub tokens: Arc<MemoryTokenStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub session: Arc<SessionStore>,
    pub cart: Arc<CartStore>,
}

impl TestStore {
    /// Start a mock backend and an unauthenticated client stack.
    pub async fn start() -> Self {
        Self::build(MemoryTokenStore::new()).await
    }

    /// Start with a persisted token pair for user 7 (`jwatson`).
    pub async fn start_signed_in() -> Self {
        let token = access_token_with_names(7, "jwatson", "john@example.com", "John", "Watson");
        Self::build(MemoryTokenStore::with_tokens(&token, "refresh-1")).await
    }

    /// Start with an arbitrary persisted token pair.
    pub async fn start_with_tokens(access: &str, refresh: &str) -> Self {
        Self::build(MemoryTokenStore::with_tokens(access, refresh)).await
    }

    async fn build(tokens: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let tokens = Arc::new(tokens);
        let notifier = Arc::new(RecordingNotifier::new());

        let base_url = server
            .uri()
            .parse()
            .unwrap_or_else(|_| unreachable!("mock server uri is a valid url"));
        let api = ApiClient::new(base_url, tokens.clone());
        let session = Arc::new(SessionStore::new(
            api.clone(),
            tokens.clone(),
            notifier.clone(),
        ));
        let cart = Arc::new(CartStore::new(api.clone(), notifier.clone()));

        Self {
            server,
            api,
            tokens,
            notifier,
            session,
            cart,
        }
    }

    /// Build a checkout sequencer over this stack.
    #[must_use]
    pub fn checkout<G: PaymentGateway>(&self, gateway: G) -> CheckoutSequencer<G> {
        CheckoutSequencer::new(
            self.api.clone(),
            self.session.clone(),
            self.cart.clone(),
            gateway,
            self.notifier.clone(),
        )
    }
}

// =============================================================================
// Response fixtures
// =============================================================================

/// A product as the backend serializes it.
#[must_use]
pub fn product_json(id: i64, name: &str, price: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "inventory_count": 10,
        "image_url": format!("https://cdn.example.com/{id}.jpg"),
        "is_in_stock": true,
        "average_rating": 4.0,
        "review_count": 1,
        "created_at": "2025-03-01T10:00:00Z",
        "updated_at": "2025-03-01T10:00:00Z",
    })
}

/// A cart line item as the backend serializes it.
#[must_use]
pub fn cart_item_json(id: i64, product: &serde_json::Value, quantity: u32) -> serde_json::Value {
    let unit: rust_decimal::Decimal = product["price"]
        .as_str()
        .unwrap_or("0")
        .parse()
        .unwrap_or_default();
    serde_json::json!({
        "id": id,
        "product": product,
        "product_id": product["id"],
        "quantity": quantity,
        "total_price": (unit * rust_decimal::Decimal::from(quantity)).to_string(),
        "created_at": "2025-03-02T10:00:00Z",
        "updated_at": "2025-03-02T10:00:00Z",
    })
}

/// The aggregate total for a set of lines.
#[must_use]
pub fn cart_total_json(amount: &str, total_items: u32, item_count: u32) -> serde_json::Value {
    serde_json::json!({
        "total_amount": amount,
        "total_items": total_items,
        "item_count": item_count,
    })
}

/// An order as the backend serializes it on creation.
#[must_use]
pub fn order_json(
    id: i64,
    payment_intent: &str,
    client_secret: Option<&str>,
    shipping_address: &str,
) -> serde_json::Value {
    let mut order = serde_json::json!({
        "id": id,
        "user": 7,
        "total_amount": "29.00",
        "status": "pending",
        "stripe_payment_intent_id": payment_intent,
        "shipping_address": shipping_address,
        "order_items": [],
        "items_count": 1,
        "created_at": "2025-03-02T11:00:00Z",
        "updated_at": "2025-03-02T11:00:00Z",
    });
    if let (Some(secret), Some(map)) = (client_secret, order.as_object_mut()) {
        map.insert(
            "client_secret".to_string(),
            serde_json::Value::String(secret.to_string()),
        );
    }
    order
}

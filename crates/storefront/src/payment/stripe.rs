//! Stripe payment gateway.
//!
//! Confirms payment intents the way the browser SDK does: a form-encoded
//! confirm call authenticated with the publishable key, carrying the
//! client secret and the card fields. The intent id is embedded in the
//! client secret (`pi_..._secret_...`), so no extra lookup is needed.

use std::sync::Arc;

use rand::Rng as _;
use rand::distr::Alphanumeric;
use secrecy::ExposeSecret as _;
use serde::Deserialize;
use tracing::instrument;

use super::{CardDetails, PaymentConfirmation, PaymentError, PaymentGateway};

const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Client for Stripe's payment intent confirmation endpoint.
#[derive(Clone)]
pub struct StripeGateway {
    inner: Arc<StripeGatewayInner>,
}

struct StripeGatewayInner {
    http: reqwest::Client,
    publishable_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct IntentBody {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl StripeGateway {
    /// Create a gateway using the given publishable key.
    #[must_use]
    pub fn new(publishable_key: impl Into<String>) -> Self {
        Self::with_api_base(publishable_key, STRIPE_API_BASE)
    }

    /// Create a gateway against a non-default API base (used in tests).
    #[must_use]
    pub fn with_api_base(publishable_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(StripeGatewayInner {
                http: reqwest::Client::new(),
                publishable_key: publishable_key.into(),
                api_base: api_base.into(),
            }),
        }
    }

    /// Extract the payment intent id from a client secret
    /// (`pi_123_secret_456` -> `pi_123`).
    fn intent_id(client_secret: &str) -> Option<&str> {
        client_secret
            .split_once("_secret")
            .map(|(id, _)| id)
            .filter(|id| !id.is_empty())
    }
}

impl PaymentGateway for StripeGateway {
    #[instrument(skip_all)]
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        card: &CardDetails,
    ) -> Result<PaymentConfirmation, PaymentError> {
        let intent =
            Self::intent_id(client_secret).ok_or(PaymentError::MalformedClientSecret)?;

        let params = [
            ("client_secret", client_secret.to_string()),
            ("payment_method_data[type]", "card".to_string()),
            (
                "payment_method_data[card][number]",
                card.number.expose_secret().to_string(),
            ),
            (
                "payment_method_data[card][exp_month]",
                card.exp_month.to_string(),
            ),
            (
                "payment_method_data[card][exp_year]",
                card.exp_year.to_string(),
            ),
            (
                "payment_method_data[card][cvc]",
                card.cvc.expose_secret().to_string(),
            ),
        ];

        // One key per confirmation attempt; retries of the same attempt are
        // a caller concern.
        let idempotency_key: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();

        let response = self
            .inner
            .http
            .post(format!(
                "{}/v1/payment_intents/{intent}/confirm",
                self.inner.api_base
            ))
            .basic_auth(&self.inner.publishable_key, None::<&str>)
            .header("Idempotency-Key", idempotency_key)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| format!("Payment failed (HTTP {status})"));
            tracing::warn!(status = %status, "processor rejected payment");
            return Err(PaymentError::Declined(message));
        }

        let body: IntentBody = serde_json::from_str(&text)?;
        Ok(PaymentConfirmation {
            payment_intent: body.id,
            status: body.status.as_str().into(),
        })
    }
}

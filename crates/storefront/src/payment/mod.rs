//! Payment processor integration.
//!
//! The checkout sequencer talks to the processor through the
//! [`PaymentGateway`] trait so the sequencing logic stays independent of
//! the processor's HTTP surface (and testable without it). The production
//! implementation is [`StripeGateway`].

mod stripe;

pub use stripe::StripeGateway;

use secrecy::SecretString;
use thiserror::Error;

/// Errors reported by the payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The processor rejected the payment. The message is the processor's
    /// own, surfaced to the user verbatim.
    #[error("{0}")]
    Declined(String),

    /// The processor reported a non-success status without an explicit
    /// error. Treated as failure all the same.
    #[error("payment was not completed (status: {0})")]
    Incomplete(PaymentIntentStatus),

    /// The client secret did not carry a payment intent id.
    #[error("malformed client secret")]
    MalformedClientSecret,

    /// Transport-level failure talking to the processor.
    #[error("payment transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The processor's response was not the expected shape.
    #[error("error decoding processor response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Card details collected from the user.
///
/// Number and CVC are held as secrets; they are only exposed at the
/// moment the confirmation request is form-encoded.
#[derive(Debug, Clone)]
pub struct CardDetails {
    pub number: SecretString,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: SecretString,
}

impl CardDetails {
    /// Create card details from user input.
    #[must_use]
    pub fn new(number: &str, exp_month: u8, exp_year: u16, cvc: &str) -> Self {
        Self {
            number: SecretString::from(number),
            exp_month,
            exp_year,
            cvc: SecretString::from(cvc),
        }
    }
}

/// Status of a payment intent as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentIntentStatus {
    Succeeded,
    Processing,
    RequiresAction,
    RequiresPaymentMethod,
    Canceled,
    /// A status this client does not recognize. Never treated as success.
    Other(String),
}

impl PaymentIntentStatus {
    /// Whether the processor reports the payment as complete.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl From<&str> for PaymentIntentStatus {
    fn from(status: &str) -> Self {
        match status {
            "succeeded" => Self::Succeeded,
            "processing" => Self::Processing,
            "requires_action" => Self::RequiresAction,
            "requires_payment_method" => Self::RequiresPaymentMethod,
            "canceled" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Processing => write!(f, "processing"),
            Self::RequiresAction => write!(f, "requires_action"),
            Self::RequiresPaymentMethod => write!(f, "requires_payment_method"),
            Self::Canceled => write!(f, "canceled"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

/// Outcome of a successful confirmation call.
///
/// "Successful" here means the processor answered; whether the payment
/// went through is in `status`.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    /// The processor's payment intent id.
    pub payment_intent: String,
    pub status: PaymentIntentStatus,
}

/// A client capable of confirming a card payment against the processor.
pub trait PaymentGateway: Send + Sync {
    /// Submit card details plus the order's client secret to the processor.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Declined` with the processor's message when
    /// the payment is rejected, or a transport/decoding error when the
    /// processor cannot be reached.
    fn confirm_card_payment(
        &self,
        client_secret: &str,
        card: &CardDetails,
    ) -> impl Future<Output = Result<PaymentConfirmation, PaymentError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(PaymentIntentStatus::from("succeeded").succeeded());
        assert!(!PaymentIntentStatus::from("processing").succeeded());
        assert_eq!(
            PaymentIntentStatus::from("requires_capture"),
            PaymentIntentStatus::Other("requires_capture".to_string())
        );
    }

    #[test]
    fn test_status_display_roundtrip() {
        for raw in ["succeeded", "requires_action", "weird_status"] {
            assert_eq!(PaymentIntentStatus::from(raw).to_string(), raw);
        }
    }
}

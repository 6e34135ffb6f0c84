//! Unified error handling for the storefront client.
//!
//! Each store action catches its own errors, surfaces exactly one
//! user-facing notification, and rethrows so calling views may abort their
//! own flow. `StoreError` is the top-level type those callers see; the
//! per-concern enums it wraps are:
//!
//! - [`AuthError`](crate::services::session::AuthError) - bad credentials
//!   or an expired session
//! - [`CartError`](crate::services::cart::CartError) - inventory or
//!   validation rejections
//! - [`CheckoutError`](crate::services::checkout::CheckoutError) - checkout
//!   guards and payment setup failures (the backend did not return a
//!   payable order)
//! - [`PaymentError`](crate::payment::PaymentError) - the processor
//!   declined or errored
//! - [`ApiError`](crate::api::ApiError) - generic transport failure

use thiserror::Error;

use crate::api::ApiError;
use crate::payment::PaymentError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::services::session::AuthError;

/// Top-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Authentication failed or the session expired.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// The backend rejected a cart mutation.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// A checkout guard or payment setup step failed.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// The payment processor declined or errored.
    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Generic transport failure talking to the backend.
    #[error("network error: {0}")]
    Network(#[from] ApiError),
}

impl StoreError {
    /// The structured error detail reported by the backend, when present.
    #[must_use]
    pub fn backend_detail(&self) -> Option<&str> {
        match self {
            Self::Auth(AuthError::Rejected { detail })
            | Self::Cart(CartError::Rejected { detail }) => detail.as_deref(),
            Self::Network(api) | Self::Auth(AuthError::Api(api)) | Self::Cart(CartError::Api(api)) => {
                api.detail()
            }
            _ => None,
        }
    }

    /// The single user-facing message for this error.
    ///
    /// Prefers the backend's structured detail field, then the error's own
    /// message, then the caller-provided fallback.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(detail) = self.backend_detail()
            && !detail.is_empty()
        {
            return detail.to_string();
        }
        match self {
            // Processor messages are surfaced verbatim; guard messages are
            // already written for the user.
            Self::Payment(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Auth(AuthError::SessionExpired | AuthError::Api(ApiError::SessionExpired))
            | Self::Network(ApiError::SessionExpired) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            _ => fallback.to_string(),
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_user_message_prefers_backend_detail() {
        let err = StoreError::Cart(CartError::Rejected {
            detail: Some("Not enough inventory".to_string()),
        });
        assert_eq!(err.user_message("Checkout failed"), "Not enough inventory");
    }

    #[test]
    fn test_user_message_uses_processor_message_verbatim() {
        let err = StoreError::Payment(PaymentError::Declined(
            "Your card was declined.".to_string(),
        ));
        assert_eq!(err.user_message("Checkout failed"), "Your card was declined.");
    }

    #[test]
    fn test_user_message_falls_back_for_transport_errors() {
        let err = StoreError::Network(ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: None,
        });
        assert_eq!(err.user_message("Checkout failed"), "Checkout failed");
    }

    #[test]
    fn test_user_message_session_expired() {
        let err = StoreError::Network(ApiError::SessionExpired);
        assert_eq!(
            err.user_message("Checkout failed"),
            "Your session has expired. Please sign in again."
        );
    }
}

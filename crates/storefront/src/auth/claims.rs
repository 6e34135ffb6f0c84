//! Access-token claims decoding.
//!
//! The access token is a JWT whose payload carries the user's identity.
//! Only the middle segment is decoded (base64url JSON); the signature is
//! NOT verified and expiry is NOT checked. This is client-side trust for
//! display purposes, not a security boundary - the backend re-validates
//! the token on every request.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

use copperleaf_core::{User, UserId};

/// Errors decoding a token payload.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// The token does not have a payload segment.
    #[error("token is not a three-part JWT")]
    Malformed,

    /// The payload segment is not valid base64url.
    #[error("token payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload is not the expected JSON shape.
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims carried in the access token's payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    pub user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Expiry (unix seconds). Decoded for diagnostics only; validity is
    /// assumed until the backend returns unauthorized.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT without verifying it.
    ///
    /// # Errors
    ///
    /// Returns `ClaimsError` if the token has no payload segment or the
    /// segment is not base64url-encoded JSON of the expected shape.
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let payload = token.split('.').nth(1).ok_or(ClaimsError::Malformed)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The user these claims describe.
    #[must_use]
    pub fn user(&self) -> User {
        User {
            id: UserId::new(self.user_id),
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

//! Session store: authentication state derived from the access token.
//!
//! The user's identity is decoded from the persisted access token's
//! payload - there is no server round-trip to fetch a profile, and no
//! freshness check at startup. Validity is assumed until a request comes
//! back unauthorized, at which point the API client clears the tokens and
//! the owning front end calls [`SessionStore::invalidate`].

use std::sync::{Arc, RwLock};

use thiserror::Error;

use copperleaf_core::{LoginCredentials, RegisterCredentials, User};

use crate::api::{ApiClient, ApiError};
use crate::auth::{TokenClaims, TokenStore};
use crate::auth::tokens::PersistedTokens;
use crate::notify::SharedNotifier;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the credentials.
    #[error("{}", detail.as_deref().unwrap_or("invalid credentials"))]
    Rejected { detail: Option<String> },

    /// The session could not be recovered and the user must sign in again.
    #[error("session expired")]
    SessionExpired,

    /// The backend returned a token whose payload cannot be decoded.
    #[error("malformed access token: {0}")]
    MalformedToken(#[from] crate::auth::ClaimsError),

    /// Transport failure.
    #[error("network error: {0}")]
    Api(ApiError),
}

/// Authentication state.
///
/// Invariant: `user` is `Some` iff a decodable access token is persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Owns authentication state; exposes login, register, and logout.
pub struct SessionStore {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    notifier: SharedNotifier,
    state: RwLock<Session>,
}

impl SessionStore {
    /// Create the store, restoring state from the persisted access token.
    ///
    /// A token that fails to decode removes **both** persisted tokens and
    /// leaves the session unauthenticated.
    #[must_use]
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenStore>, notifier: SharedNotifier) -> Self {
        let state = RwLock::new(Self::restore(tokens.as_ref()));
        Self {
            api,
            tokens,
            notifier,
            state,
        }
    }

    fn restore(tokens: &dyn TokenStore) -> Session {
        let Some(access) = tokens.access_token() else {
            return Session::default();
        };

        match TokenClaims::decode(&access) {
            Ok(claims) => Session {
                user: Some(claims.user()),
            },
            Err(err) => {
                tracing::warn!(error = %err, "persisted access token is undecodable; discarding");
                tokens.clear();
                Session::default()
            }
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Sign in with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the backend's detail when the
    /// credentials are wrong. The error is also surfaced as a notification
    /// before returning, so callers only need to abort their own flow.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(), AuthError> {
        let result = self.api.login(credentials).await;
        self.finish_auth(result, "Login successful!", "Login failed")
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Same contract as [`login`](Self::login), against the registration
    /// endpoint.
    pub async fn register(&self, credentials: &RegisterCredentials) -> Result<(), AuthError> {
        let result = self.api.register(credentials).await;
        self.finish_auth(result, "Registration successful!", "Registration failed")
    }

    /// Sign out: clear persisted tokens and reset state.
    ///
    /// Idempotent; no network call. Always succeeds.
    pub fn logout(&self) {
        self.tokens.clear();
        *self.write_state() = Session::default();
        self.notifier.success("Logged out successfully");
    }

    /// Drop the session without a notification.
    ///
    /// Used when a request reported the session expired; the API client
    /// has already cleared the persisted tokens by then.
    pub fn invalidate(&self) {
        self.tokens.clear();
        *self.write_state() = Session::default();
    }

    fn finish_auth(
        &self,
        result: Result<copperleaf_core::AuthTokens, ApiError>,
        success_message: &str,
        failure_message: &str,
    ) -> Result<(), AuthError> {
        let auth_tokens = match result {
            Ok(tokens) => tokens,
            Err(err) => {
                let err = Self::rejection(err);
                let message = match &err {
                    AuthError::Rejected {
                        detail: Some(detail),
                    } => detail.clone(),
                    _ => failure_message.to_string(),
                };
                self.notifier.error(&message);
                return Err(err);
            }
        };

        self.tokens.save(&PersistedTokens {
            access_token: auth_tokens.access.clone(),
            refresh_token: auth_tokens.refresh,
        });

        let claims = match TokenClaims::decode(&auth_tokens.access) {
            Ok(claims) => claims,
            Err(err) => {
                // The backend handed us a token we cannot read; treat it
                // like any other rejected auth attempt.
                tracing::error!(error = %err, "backend returned an undecodable access token");
                self.tokens.clear();
                self.notifier.error(failure_message);
                return Err(err.into());
            }
        };

        *self.write_state() = Session {
            user: Some(claims.user()),
        };
        self.notifier.success(success_message);
        Ok(())
    }

    /// Map a transport error from an auth endpoint into the taxonomy.
    fn rejection(err: ApiError) -> AuthError {
        match err {
            ApiError::Status { status, detail } if status.is_client_error() => {
                AuthError::Rejected { detail }
            }
            ApiError::SessionExpired => AuthError::SessionExpired,
            other => AuthError::Api(other),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_state().is_authenticated()
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read_state().user.clone()
    }

    /// A copy of the current session state.
    #[must_use]
    pub fn session(&self) -> Session {
        self.read_state().clone()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::notify::TracingNotifier;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn access_token(user_id: i64, username: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&serde_json::json!({
                "user_id": user_id,
                "username": username,
                "email": format!("{username}@example.com"),
            }))
            .unwrap(),
        );
        format!("{header}.{payload}.sig")
    }

    fn store_with(tokens: Arc<MemoryTokenStore>) -> SessionStore {
        let api = ApiClient::new(
            "http://localhost:8000/api".parse().unwrap(),
            tokens.clone(),
        );
        SessionStore::new(api, tokens, Arc::new(TracingNotifier))
    }

    #[test]
    fn test_restore_from_valid_token() {
        let tokens = Arc::new(MemoryTokenStore::with_tokens(
            &access_token(7, "jwatson"),
            "refresh",
        ));
        let store = store_with(tokens);

        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap().username, "jwatson");
    }

    #[test]
    fn test_restore_discards_undecodable_token() {
        let tokens = Arc::new(MemoryTokenStore::with_tokens("garbage", "refresh"));
        let store = store_with(tokens.clone());

        assert!(!store.is_authenticated());
        // Both tokens removed, not just the access token.
        assert!(tokens.load().is_none());
    }

    #[test]
    fn test_restore_without_tokens() {
        let store = store_with(Arc::new(MemoryTokenStore::new()));
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let tokens = Arc::new(MemoryTokenStore::with_tokens(
            &access_token(7, "jwatson"),
            "refresh",
        ));
        let store = store_with(tokens.clone());

        store.logout();
        assert!(!store.is_authenticated());
        assert!(tokens.load().is_none());

        // Second logout: still unauthenticated, no panic.
        store.logout();
        assert!(!store.is_authenticated());
    }
}

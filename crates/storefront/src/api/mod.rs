//! REST API client for the store backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no local sync, direct API calls
//! - Bearer token attached from the [`TokenStore`](crate::auth::TokenStore)
//!   on every request
//! - A 401 triggers exactly one token-refresh-and-retry per request, never
//!   recursively; a second 401 clears the persisted tokens and surfaces
//!   [`ApiError::SessionExpired`]
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL); cart,
//!   order, and review reads never are
//!
//! # Example
//!
//! ```rust,ignore
//! use copperleaf_storefront::api::ApiClient;
//!
//! let api = ApiClient::new(config.api_base_url.clone(), tokens);
//!
//! // Browse the catalog
//! let page = api.products(1, Some("mug"), None).await?;
//!
//! // Mutate the cart
//! let item = api.add_cart_item(product.id, 2).await?;
//! ```

mod cache;
pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;

pub use orders::PaymentAck;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use copperleaf_core::{AuthTokens, LoginCredentials, RegisterCredentials};

use crate::auth::TokenStore;

use cache::CacheValue;

/// Errors that can occur when talking to the store backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected shape.
    #[error("error decoding response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The session could not be recovered: the refresh attempt failed or a
    /// refreshed request was rejected again. Both persisted tokens have
    /// been cleared.
    #[error("session expired")]
    SessionExpired,

    /// The backend rejected the request with a non-success status.
    #[error("{}", detail.as_deref().unwrap_or("request failed"))]
    Status {
        status: StatusCode,
        /// The backend's structured `detail` field, when present.
        detail: Option<String>,
    },
}

impl ApiError {
    /// The backend's structured error detail, when present.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status for status-carrying errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Shape of the backend's error bodies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the store's REST API.
///
/// Cheaply cloneable; all clones share the HTTP connection pool, the token
/// store, and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    catalog_cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(base_url: Url, tokens: Arc<dyn TokenStore>) -> Self {
        let catalog_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url,
                tokens,
                catalog_cache,
            }),
        }
    }

    /// The token store this client attaches bearer tokens from.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    pub(crate) fn catalog_cache(&self) -> &Cache<String, CacheValue> {
        &self.inner.catalog_cache
    }

    /// Build the absolute URL for an endpoint path like `/cart/`.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{path}",
            self.inner.base_url.as_str().trim_end_matches('/')
        )
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Send a request, attaching the bearer token and recovering from a 401
    /// with exactly one refresh-and-retry.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut refreshed = false;

        loop {
            let mut request = self.inner.http.request(method.clone(), self.endpoint(path));
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(access) = self.inner.tokens.access_token() {
                request = request.bearer_auth(access);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;

            if response.status() == StatusCode::UNAUTHORIZED {
                if refreshed {
                    // The refreshed token was rejected too; give up.
                    self.inner.tokens.clear();
                    return Err(ApiError::SessionExpired);
                }
                if self.inner.tokens.refresh_token().is_some() {
                    self.refresh_access_token().await?;
                    refreshed = true;
                    continue;
                }
                // No refresh token: an unauthenticated request was rejected
                // (e.g. bad login credentials). Pass the 401 through.
            }

            return Ok(response);
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Any failure here clears both persisted tokens: the session is over.
    async fn refresh_access_token(&self) -> Result<(), ApiError> {
        #[derive(Debug, Deserialize)]
        struct RefreshResponse {
            access: String,
        }

        let Some(refresh) = self.inner.tokens.refresh_token() else {
            self.inner.tokens.clear();
            return Err(ApiError::SessionExpired);
        };

        let result = self
            .inner
            .http
            .post(self.endpoint("/token/refresh/"))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<RefreshResponse>().await {
                    Ok(body) => {
                        self.inner.tokens.set_access(&body.access);
                        tracing::debug!("access token refreshed");
                        Ok(())
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "token refresh returned an unexpected body");
                        self.inner.tokens.clear();
                        Err(ApiError::SessionExpired)
                    }
                }
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "token refresh rejected");
                self.inner.tokens.clear();
                Err(ApiError::SessionExpired)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh request failed");
                self.inner.tokens.clear();
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// Read the response body, mapping non-success statuses to
    /// `ApiError::Status` with the backend's detail field when present.
    async fn expect_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        // Read as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|err| {
            tracing::error!(
                error = %err,
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse backend response"
            );
            ApiError::Decode(err)
        })
    }

    /// Check a bodiless response for success.
    async fn expect_success(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await?;
        Err(Self::status_error(status, &text))
    }

    fn status_error(status: StatusCode, body: &str) -> ApiError {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail);
        if detail.is_none() {
            tracing::debug!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "backend error without a detail field"
            );
        }
        ApiError::Status { status, detail }
    }

    // =========================================================================
    // JSON helpers
    // =========================================================================

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, query, None).await?;
        Self::expect_json(response).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, path, &[], Some(&body)).await?;
        Self::expect_json(response).await
    }

    pub(crate) async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::PUT, path, &[], Some(&body)).await?;
        Self::expect_json(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send(Method::DELETE, path, &[], None).await?;
        Self::expect_success(response).await
    }

    // =========================================================================
    // Auth endpoints
    // =========================================================================

    /// Exchange credentials for a token pair.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's detail when the
    /// credentials are rejected.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthTokens, ApiError> {
        self.post_json("/token/", credentials).await
    }

    /// Register a new account, returning a token pair.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's detail when
    /// registration is rejected.
    pub async fn register(
        &self,
        credentials: &RegisterCredentials,
    ) -> Result<AuthTokens, ApiError> {
        self.post_json("/register/", credentials).await
    }
}

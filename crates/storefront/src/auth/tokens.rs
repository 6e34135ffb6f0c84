//! Persisted auth token storage.
//!
//! The browser build kept the token pair in local storage under fixed
//! keys; here the same contract is a small JSON file. Read failures
//! degrade to "no tokens" and write failures are logged - persistence
//! problems must never take down a storefront action.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// The persisted token pair. Field names are the fixed storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Storage for the auth token pair.
///
/// Implementations must tolerate concurrent access; all methods are
/// infallible from the caller's perspective.
pub trait TokenStore: Send + Sync {
    /// Load the persisted token pair, if any.
    fn load(&self) -> Option<PersistedTokens>;

    /// Persist a token pair, replacing any previous one.
    fn save(&self, tokens: &PersistedTokens);

    /// Remove both persisted tokens.
    fn clear(&self);

    /// Replace only the access token, keeping the refresh token.
    ///
    /// No-op when nothing is persisted (a refresh without a stored pair
    /// cannot happen in practice).
    fn set_access(&self, access: &str) {
        if let Some(mut tokens) = self.load() {
            tokens.access_token = access.to_string();
            self.save(&tokens);
        }
    }

    /// The persisted access token, if any.
    fn access_token(&self) -> Option<String> {
        self.load().map(|t| t.access_token)
    }

    /// The persisted refresh token, if any.
    fn refresh_token(&self) -> Option<String> {
        self.load().map(|t| t.refresh_token)
    }
}

// =============================================================================
// FileTokenStore
// =============================================================================

/// Token store backed by a JSON file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store persisting to `path`. The file (and its parent
    /// directory) is created on first save.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<PersistedTokens> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read token file");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(tokens) => Some(tokens),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "token file is not valid JSON");
                None
            }
        }
    }

    fn save(&self, tokens: &PersistedTokens) {
        if let Some(parent) = self.path.parent()
            && let Err(err) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), error = %err, "failed to create token directory");
            return;
        }

        match serde_json::to_vec_pretty(tokens) {
            Ok(bytes) => {
                if let Err(err) = std::fs::write(&self.path, bytes) {
                    tracing::warn!(path = %self.path.display(), error = %err, "failed to write token file");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize tokens");
            }
        }
    }

    fn clear(&self) {
        if let Err(err) = std::fs::remove_file(&self.path)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to remove token file");
        }
    }
}

// =============================================================================
// MemoryTokenStore
// =============================================================================

/// In-memory token store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<PersistedTokens>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a token pair.
    #[must_use]
    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        let store = Self::new();
        store.save(&PersistedTokens {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        });
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<PersistedTokens> {
        self.tokens
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn save(&self, tokens: &PersistedTokens) {
        *self
            .tokens
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(tokens.clone());
    }

    fn clear(&self) {
        *self
            .tokens
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: &str) -> PersistedTokens {
        PersistedTokens {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().is_none());

        store.save(&pair("a1", "r1"));
        assert_eq!(store.access_token().as_deref(), Some("a1"));
        assert_eq!(store.refresh_token().as_deref(), Some("r1"));

        store.set_access("a2");
        assert_eq!(store.access_token().as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().as_deref(), Some("r1"));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_set_access_without_pair_is_noop() {
        let store = MemoryTokenStore::new();
        store.set_access("a1");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "copperleaf-tokens-test-{}.json",
            std::process::id()
        ));
        let store = FileTokenStore::new(path.clone());
        store.clear();

        assert!(store.load().is_none());
        store.save(&pair("a1", "r1"));
        assert_eq!(store.load(), Some(pair("a1", "r1")));

        store.clear();
        assert!(store.load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_tolerates_garbage() {
        let path = std::env::temp_dir().join(format!(
            "copperleaf-tokens-garbage-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, b"not json").unwrap();

        let store = FileTokenStore::new(path.clone());
        assert!(store.load().is_none());

        store.clear();
        assert!(!path.exists());
    }
}

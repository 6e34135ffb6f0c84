//! Token persistence and client-side claims decoding.
//!
//! Authentication state is derived entirely from the persisted access
//! token's payload; the backend is only consulted when a request comes
//! back unauthorized. See [`claims`] for the decoding rules and
//! [`tokens`] for the persistence contract.

pub mod claims;
pub mod tokens;

pub use claims::{ClaimsError, TokenClaims};
pub use tokens::{FileTokenStore, MemoryTokenStore, PersistedTokens, TokenStore};

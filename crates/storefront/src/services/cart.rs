//! Cart store: a server-authoritative snapshot with refetch-after-write.
//!
//! Every mutation is followed by a full refetch, so the store never needs
//! reconciliation logic between optimistic and server state. The snapshot
//! is only ever replaced wholesale; a failed refetch leaves the previous
//! snapshot stale rather than crashing the caller.
//!
//! Mutations are serialized on an async mutex: a double-submitted action
//! queues behind the first instead of interleaving with it.

use std::sync::{Arc, RwLock};

use thiserror::Error;
use tokio::sync::Mutex;

use copperleaf_core::{CartItem, CartItemId, CartTotal, Product};

use crate::api::{ApiClient, ApiError};
use crate::notify::SharedNotifier;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The backend rejected the mutation (inventory, validation).
    #[error("{}", detail.as_deref().unwrap_or("the cart request was rejected"))]
    Rejected { detail: Option<String> },

    /// Transport failure.
    #[error("network error: {0}")]
    Api(ApiError),
}

/// The cart as last reported by the backend.
#[derive(Debug, Clone, Default)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total: Option<CartTotal>,
}

impl CartSnapshot {
    /// Whether the cart has no line items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Owns the cart snapshot; all mutations refetch from the backend.
pub struct CartStore {
    api: ApiClient,
    notifier: SharedNotifier,
    state: RwLock<CartSnapshot>,
    /// Serializes mutating actions per cart.
    write_lock: Mutex<()>,
}

impl CartStore {
    /// Create an empty store. Call [`refresh`](Self::refresh) to load the
    /// initial snapshot.
    #[must_use]
    pub fn new(api: ApiClient, notifier: SharedNotifier) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(CartSnapshot::default()),
            write_lock: Mutex::new(()),
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Refetch the item list and aggregate total and replace the snapshot.
    ///
    /// The two fetches run concurrently and both must settle. If either
    /// fails the snapshot is left untouched (stale beats partial) and the
    /// failure is logged rather than surfaced.
    pub async fn refresh(&self) {
        let (items, total) = tokio::join!(self.api.cart_items(), self.api.cart_total());

        match (items, total) {
            (Ok(items), Ok(total)) => {
                *self.write_state() = CartSnapshot {
                    items,
                    total: Some(total),
                };
            }
            (items, total) => {
                let error = items.err().or_else(|| total.err());
                tracing::warn!(
                    error = %error.map_or_else(|| "unknown".to_string(), |e| e.to_string()),
                    "failed to refresh cart; keeping previous snapshot"
                );
            }
        }
    }

    /// Add a product to the cart, then refetch.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Rejected` with the backend's detail when
    /// inventory or validation fails. The error is surfaced as a
    /// notification before returning.
    pub async fn add_to_cart(&self, product: &Product, quantity: u32) -> Result<(), CartError> {
        let _guard = self.write_lock.lock().await;

        match self.api.add_cart_item(product.id, quantity).await {
            Ok(_) => {
                self.refresh().await;
                self.notifier
                    .success(&format!("{} added to cart!", product.name));
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Failed to add item to cart")),
        }
    }

    /// Change a line item's quantity, then refetch.
    ///
    /// Quantities below 1 are the caller's responsibility to reject; the
    /// store forwards what it is given.
    ///
    /// # Errors
    ///
    /// Same contract as [`add_to_cart`](Self::add_to_cart).
    pub async fn update_item(&self, id: CartItemId, quantity: u32) -> Result<(), CartError> {
        let _guard = self.write_lock.lock().await;

        match self.api.update_cart_item(id, quantity).await {
            Ok(_) => {
                self.refresh().await;
                self.notifier.success("Cart updated!");
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Failed to update cart")),
        }
    }

    /// Remove a line item, then refetch.
    ///
    /// # Errors
    ///
    /// Same contract as [`add_to_cart`](Self::add_to_cart).
    pub async fn remove_item(&self, id: CartItemId) -> Result<(), CartError> {
        let _guard = self.write_lock.lock().await;

        match self.api.remove_cart_item(id).await {
            Ok(()) => {
                self.refresh().await;
                self.notifier.success("Item removed from cart!");
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Failed to remove item from cart")),
        }
    }

    /// Empty the cart.
    ///
    /// Resets the local snapshot immediately instead of waiting on a
    /// refetch.
    ///
    /// # Errors
    ///
    /// Same contract as [`add_to_cart`](Self::add_to_cart).
    pub async fn clear(&self) -> Result<(), CartError> {
        let _guard = self.write_lock.lock().await;

        match self.api.clear_cart().await {
            Ok(()) => {
                *self.write_state() = CartSnapshot::default();
                self.notifier.success("Cart cleared!");
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Failed to clear cart")),
        }
    }

    /// Map the transport error, surface one notification, and hand the
    /// error back for the caller to rethrow.
    fn fail(&self, err: ApiError, fallback: &str) -> CartError {
        let err = match err {
            ApiError::Status { status, detail } if status.is_client_error() => {
                CartError::Rejected { detail }
            }
            other => CartError::Api(other),
        };

        let message = match &err {
            CartError::Rejected {
                detail: Some(detail),
            } => detail.clone(),
            _ => fallback.to_string(),
        };
        self.notifier.error(&message);
        err
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current line items.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.read_state().items.clone()
    }

    /// The aggregate totals from the last successful refresh.
    #[must_use]
    pub fn total(&self) -> Option<CartTotal> {
        self.read_state().total.clone()
    }

    /// Whether the cart snapshot has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_state().is_empty()
    }

    /// A copy of the full snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.read_state().clone()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, CartSnapshot> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, CartSnapshot> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::notify::TracingNotifier;

    #[test]
    fn test_empty_snapshot() {
        let api = ApiClient::new(
            "http://localhost:8000/api".parse().expect("url"),
            Arc::new(MemoryTokenStore::new()),
        );
        let store = CartStore::new(api, Arc::new(TracingNotifier));

        assert!(store.is_empty());
        assert!(store.items().is_empty());
        assert!(store.total().is_none());
    }
}

//! Cart endpoints.
//!
//! Never cached: the cart snapshot is server-authoritative and the store
//! refetches after every mutation.

use serde::Serialize;
use tracing::instrument;

use copperleaf_core::{CartItem, CartItemId, CartTotal, ProductId};

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct AddItemBody {
    product_id: ProductId,
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct UpdateItemBody {
    quantity: u32,
}

impl ApiClient {
    /// Get the cart's line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cart_items(&self) -> Result<Vec<CartItem>, ApiError> {
        self.get_json("/cart/", &[]).await
    }

    /// Get the cart's aggregate totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cart_total(&self) -> Result<CartTotal, ApiError> {
        self.get_json("/cart/total/", &[]).await
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's detail when inventory
    /// or validation rejects the add.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem, ApiError> {
        self.post_json(
            "/cart/",
            &AddItemBody {
                product_id,
                quantity,
            },
        )
        .await
    }

    /// Change a line item's quantity.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's detail on rejection.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn update_cart_item(
        &self,
        id: CartItemId,
        quantity: u32,
    ) -> Result<CartItem, ApiError> {
        self.put_json(&format!("/cart/{id}/"), &UpdateItemBody { quantity })
            .await
    }

    /// Remove a line item.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn remove_cart_item(&self, id: CartItemId) -> Result<(), ApiError> {
        self.delete(&format!("/cart/{id}/")).await
    }

    /// Remove every line item.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.delete("/cart/clear/").await
    }
}

//! Review endpoints.

use tracing::instrument;

use copperleaf_core::{NewReview, ProductId, Review, ReviewId, ReviewPatch};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Get all reviews for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product_reviews(&self, product_id: ProductId) -> Result<Vec<Review>, ApiError> {
        self.get_json(
            "/reviews/product_reviews/",
            &[("product_id", product_id.to_string())],
        )
        .await
    }

    /// Get the authenticated user's reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn my_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get_json("/reviews/my_reviews/", &[]).await
    }

    /// Whether the authenticated user may review a product.
    ///
    /// True iff they have not reviewed it yet. Purchase status is not
    /// consulted; the backend applies the same rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn can_review(&self, product_id: ProductId) -> Result<bool, ApiError> {
        let mine = self.my_reviews().await?;
        Ok(mine.iter().all(|review| review.product != product_id))
    }

    /// Create a review.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's detail on rejection
    /// (e.g. a duplicate review).
    #[instrument(skip(self, review), fields(product_id = %review.product))]
    pub async fn create_review(&self, review: &NewReview) -> Result<Review, ApiError> {
        self.post_json("/reviews/", review).await
    }

    /// Update one of the user's reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the review is not the user's or the API request
    /// fails.
    #[instrument(skip(self, patch), fields(review_id = %id))]
    pub async fn update_review(&self, id: ReviewId, patch: &ReviewPatch) -> Result<Review, ApiError> {
        self.put_json(&format!("/reviews/{id}/"), patch).await
    }

    /// Delete one of the user's reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the review is not the user's or the API request
    /// fails.
    #[instrument(skip(self), fields(review_id = %id))]
    pub async fn delete_review(&self, id: ReviewId) -> Result<(), ApiError> {
        self.delete(&format!("/reviews/{id}/")).await
    }
}

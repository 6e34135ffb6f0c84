//! Catalog endpoints.
//!
//! Product reads are cached for 5 minutes. Search results are never
//! cached - they are cheap server-side and stale hits are confusing.

use copperleaf_core::{Page, Product, ProductId};
use tracing::{debug, instrument};

use super::cache::CacheValue;
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Get a page of the product listing.
    ///
    /// Query parameters are only sent when they deviate from the backend's
    /// defaults (first page, no search, default ordering).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        page: u32,
        search: Option<&str>,
        ordering: Option<&str>,
    ) -> Result<Page<Product>, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if page > 1 {
            query.push(("page", page.to_string()));
        }
        if let Some(search) = search
            && !search.is_empty()
        {
            query.push(("search", search.to_string()));
        }
        if let Some(ordering) = ordering
            && !ordering.is_empty()
        {
            query.push(("ordering", ordering.to_string()));
        }

        let cacheable = search.is_none_or(str::is_empty);
        let cache_key = format!("products:{page}:{}", ordering.unwrap_or(""));

        if cacheable
            && let Some(CacheValue::Products(page)) = self.catalog_cache().get(&cache_key).await
        {
            debug!("cache hit for product listing");
            return Ok(page);
        }

        let listing: Page<Product> = self.get_json("/products/", &query).await?;

        if cacheable {
            self.catalog_cache()
                .insert(cache_key, CacheValue::Products(listing.clone()))
                .await;
        }

        Ok(listing)
    }

    /// Get a product by id, with its reviews embedded.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the API request
    /// fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.catalog_cache().get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get_json(&format!("/products/{id}/"), &[]).await?;

        self.catalog_cache()
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}

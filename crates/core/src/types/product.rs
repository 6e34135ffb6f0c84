//! Catalog product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::review::Review;

/// A product as reported by the catalog endpoints.
///
/// Prices are decimal-as-string on the wire; `is_in_stock`,
/// `average_rating` and `review_count` are server-computed and never
/// derived client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub inventory_count: u32,
    pub image_url: String,
    pub is_in_stock: bool,
    pub average_rating: f64,
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Embedded reviews, present on the detail endpoint only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_listing_shape() {
        // The listing endpoint omits embedded reviews.
        let json = r#"{
            "id": 3,
            "name": "Enamel Mug",
            "description": "A sturdy mug.",
            "price": "14.50",
            "inventory_count": 12,
            "image_url": "https://cdn.example.com/mug.jpg",
            "is_in_stock": true,
            "average_rating": 4.5,
            "review_count": 2,
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-02T10:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price, Decimal::new(1450, 2));
        assert!(product.reviews.is_none());
    }
}

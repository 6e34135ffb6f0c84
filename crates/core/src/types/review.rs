//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ProductId, ReviewId};

/// A review as reported by the reviews endpoints.
///
/// `user` is the reviewer's username; the backend resolves it from the
/// bearer token on write, so it never appears in the create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user: String,
    #[serde(default)]
    pub user_full_name: String,
    pub product: ProductId,
    /// 1-5 stars.
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a review.
#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub product: ProductId,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Partial update for an existing review. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

//! Cart line items and aggregate totals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartItemId, ProductId};
use super::product::Product;

/// A single line in the cart, with its product embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Line total (unit price x quantity), server-computed.
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate cart totals, fetched separately from the item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotal {
    pub total_amount: Decimal,
    /// Sum of all line quantities.
    pub total_items: u32,
    /// Number of distinct lines.
    pub item_count: u32,
}

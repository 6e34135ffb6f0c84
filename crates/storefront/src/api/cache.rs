//! Cache value types for catalog responses.

use copperleaf_core::{Page, Product};

/// Values stored in the catalog cache.
///
/// Boxed to keep the enum small; pages are already heap-heavy.
#[derive(Debug, Clone)]
pub(crate) enum CacheValue {
    Product(Box<Product>),
    Products(Page<Product>),
}

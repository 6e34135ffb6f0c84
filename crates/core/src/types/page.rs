//! Paginated response envelope.

use serde::{Deserialize, Serialize};

/// A page of results in the backend's pagination envelope.
///
/// `next`/`previous` are opaque URLs; callers paginate by page number, so
/// only their presence matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

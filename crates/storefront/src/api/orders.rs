//! Order endpoints.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use copperleaf_core::{Order, OrderId, Page};

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    shipping_address: &'a str,
}

/// Backend acknowledgement of a confirmed payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentAck {
    pub status: String,
}

/// The orders listing has been seen in both shapes, depending on whether
/// pagination is enabled server-side.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrdersBody {
    Plain(Vec<Order>),
    Paginated(Page<Order>),
}

impl ApiClient {
    /// Get the user's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        let body: OrdersBody = self.get_json("/orders/", &[]).await?;
        Ok(match body {
            OrdersBody::Plain(orders) => orders,
            OrdersBody::Paginated(page) => page.results,
        })
    }

    /// Get a single order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the API request
    /// fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get_json(&format!("/orders/{id}/"), &[]).await
    }

    /// Create an order from the current cart.
    ///
    /// The response carries the payment intent id and client secret needed
    /// to confirm payment with the processor.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's detail on rejection
    /// (e.g. an empty cart server-side).
    #[instrument(skip(self, shipping_address))]
    pub async fn create_order(&self, shipping_address: &str) -> Result<Order, ApiError> {
        self.post_json("/orders/", &CreateOrderBody { shipping_address })
            .await
    }

    /// Tell the backend the processor confirmed payment for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn confirm_payment(&self, id: OrderId) -> Result<PaymentAck, ApiError> {
        self.post_json(&format!("/orders/{id}/confirm_payment/"), &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_body_accepts_plain_array() {
        let body: OrdersBody = serde_json::from_str("[]").unwrap();
        assert!(matches!(body, OrdersBody::Plain(_)));
    }

    #[test]
    fn test_orders_body_accepts_paginated_envelope() {
        let body: OrdersBody = serde_json::from_str(
            r#"{"count": 0, "next": null, "previous": null, "results": []}"#,
        )
        .unwrap();
        assert!(matches!(body, OrdersBody::Paginated(_)));
    }
}

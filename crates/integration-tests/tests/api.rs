//! Transport scenarios: bearer attachment and the one-shot refresh-retry.

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use copperleaf_integration_tests::{TestStore, access_token, access_token_with_names};
use copperleaf_storefront::api::ApiError;
use copperleaf_storefront::auth::TokenStore;

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let token = access_token(7, "jwatson", "john@example.com");
    let store = TestStore::start_with_tokens(&token, "refresh-1").await;

    Mock::given(method("GET"))
        .and(path("/orders/"))
        .and(header("authorization", format!("Bearer {token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&store.server)
        .await;

    let orders = store.api.orders().await.expect("orders should succeed");
    assert!(orders.is_empty());
}

#[tokio::test]
async fn unauthorized_once_refreshes_and_retries() {
    // Different name claims make the two tokens distinct strings.
    let stale = access_token_with_names(7, "jwatson", "john@example.com", "John", "Watson");
    let fresh = access_token(7, "jwatson", "john@example.com");
    let store = TestStore::start_with_tokens(&stale, "refresh-1").await;

    // First attempt with the stale token is rejected.
    Mock::given(method("GET"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Given token not valid for any token type",
        })))
        .up_to_n_times(1)
        .mount(&store.server)
        .await;

    // The refresh endpoint issues a new access token...
    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .and(body_json(serde_json::json!({ "refresh": "refresh-1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access": fresh })),
        )
        .expect(1)
        .mount(&store.server)
        .await;

    // ...and the replayed request succeeds with it.
    Mock::given(method("GET"))
        .and(path("/orders/"))
        .and(header("authorization", format!("Bearer {fresh}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&store.server)
        .await;

    store.api.orders().await.expect("retried request should succeed");

    // The refreshed access token is persisted; the refresh token is kept.
    let persisted = store.tokens.load().expect("tokens should remain persisted");
    assert_eq!(persisted.access_token, fresh);
    assert_eq!(persisted.refresh_token, "refresh-1");
}

#[tokio::test]
async fn a_second_unauthorized_clears_tokens_and_expires_the_session() {
    let token = access_token(7, "jwatson", "john@example.com");
    let store = TestStore::start_with_tokens(&token, "refresh-1").await;

    // Every attempt is rejected, including the post-refresh replay.
    Mock::given(method("GET"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&store.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access": "fresh" })),
        )
        .expect(1)
        .mount(&store.server)
        .await;

    let err = store.api.orders().await.expect_err("request should fail");
    assert!(matches!(err, ApiError::SessionExpired));
    assert!(store.tokens.load().is_none(), "both tokens are cleared");
}

#[tokio::test]
async fn a_failed_refresh_clears_tokens() {
    let token = access_token(7, "jwatson", "john@example.com");
    let store = TestStore::start_with_tokens(&token, "refresh-1").await;

    Mock::given(method("GET"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Token is invalid or expired",
        })))
        .expect(1)
        .mount(&store.server)
        .await;

    let err = store.api.orders().await.expect_err("request should fail");
    assert!(matches!(err, ApiError::SessionExpired));
    assert!(store.tokens.load().is_none());
}

#[tokio::test]
async fn an_unauthenticated_rejection_is_not_a_session_expiry() {
    // No tokens persisted: a 401 passes through with the backend's detail
    // (this is how bad login credentials surface).
    let store = TestStore::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Authentication credentials were not provided.",
        })))
        .expect(1)
        .mount(&store.server)
        .await;

    let err = store.api.orders().await.expect_err("request should fail");
    match &err {
        ApiError::Status { status, detail } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(
                detail.as_deref(),
                Some("Authentication credentials were not provided.")
            );
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn orders_listing_accepts_both_wire_shapes() {
    let token = access_token(7, "jwatson", "john@example.com");
    let store = TestStore::start_with_tokens(&token, "refresh-1").await;

    let order = copperleaf_integration_tests::order_json(1, "pi_1", None, "221B Baker Street");

    // Paginated envelope first, then a plain array.
    Mock::given(method("GET"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [order.clone()],
        })))
        .up_to_n_times(1)
        .mount(&store.server)
        .await;

    let orders = store.api.orders().await.expect("paginated shape");
    assert_eq!(orders.len(), 1);

    Mock::given(method("GET"))
        .and(path("/orders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([order])))
        .mount(&store.server)
        .await;

    let orders = store.api.orders().await.expect("plain array shape");
    assert_eq!(orders.len(), 1);
}

//! Cart store scenarios: refetch-after-write, failure handling.

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use copperleaf_core::{CartItemId, Product};
use copperleaf_integration_tests::{
    Notice, TestStore, cart_item_json, cart_total_json, product_json,
};
use copperleaf_storefront::services::CartError;

fn product(id: i64, name: &str, price: &str) -> Product {
    serde_json::from_value(product_json(id, name, price)).expect("fixture should deserialize")
}

#[tokio::test]
async fn refresh_replaces_snapshot_with_backend_state() {
    let store = TestStore::start_signed_in().await;
    let mug = product_json(3, "Enamel Mug", "14.50");

    Mock::given(method("GET"))
        .and(path("/cart/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([
                cart_item_json(21, &mug, 2)
            ])),
        )
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart/total/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_total_json("29.00", 2, 1)))
        .mount(&store.server)
        .await;

    store.cart.refresh().await;

    let snapshot = store.cart.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    let item = &snapshot.items[0];
    assert_eq!(item.id, CartItemId::new(21));
    assert_eq!(item.quantity, 2);
    assert_eq!(item.product.name, "Enamel Mug");

    let total = snapshot.total.expect("total should be set");
    assert_eq!(total.total_amount.to_string(), "29.00");
    assert_eq!(total.total_items, 2);
    assert_eq!(total.item_count, 1);
}

#[tokio::test]
async fn snapshot_tracks_backend_through_mutations() {
    let store = TestStore::start_signed_in().await;
    let mug = product_json(3, "Enamel Mug", "14.50");

    // The backend reports an empty cart until the add lands.
    Mock::given(method("GET"))
        .and(path("/cart/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .up_to_n_times(1)
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart/total/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_total_json("0.00", 0, 0)))
        .up_to_n_times(1)
        .mount(&store.server)
        .await;

    store.cart.refresh().await;
    assert!(store.cart.is_empty());

    Mock::given(method("POST"))
        .and(path("/cart/"))
        .and(body_json(serde_json::json!({
            "product_id": 3,
            "quantity": 2,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(cart_item_json(21, &mug, 2)))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([
                cart_item_json(21, &mug, 2)
            ])),
        )
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart/total/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_total_json("29.00", 2, 1)))
        .mount(&store.server)
        .await;

    store
        .cart
        .add_to_cart(&product(3, "Enamel Mug", "14.50"), 2)
        .await
        .expect("add should succeed");

    // The snapshot is exactly what the backend reports, not a local merge.
    let snapshot = store.cart.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].quantity, 2);
    assert_eq!(
        store.notifier.successes(),
        vec!["Enamel Mug added to cart!".to_string()]
    );
}

#[tokio::test]
async fn rejected_add_keeps_snapshot_and_surfaces_detail() {
    let store = TestStore::start_signed_in().await;

    Mock::given(method("POST"))
        .and(path("/cart/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Not enough inventory",
        })))
        .expect(1)
        .mount(&store.server)
        .await;
    // No refetch happens after a rejected mutation.
    Mock::given(method("GET"))
        .and(path("/cart/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&store.server)
        .await;

    let err = store
        .cart
        .add_to_cart(&product(3, "Enamel Mug", "14.50"), 99)
        .await
        .expect_err("add should fail");

    match &err {
        CartError::Rejected { detail } => {
            assert_eq!(detail.as_deref(), Some("Not enough inventory"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }

    assert!(store.cart.is_empty());
    assert_eq!(
        store.notifier.notices(),
        vec![Notice::Error("Not enough inventory".to_string())]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let store = TestStore::start_signed_in().await;
    let mug = product_json(3, "Enamel Mug", "14.50");

    Mock::given(method("GET"))
        .and(path("/cart/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([
                cart_item_json(21, &mug, 1)
            ])),
        )
        .up_to_n_times(1)
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart/total/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_total_json("14.50", 1, 1)))
        .up_to_n_times(1)
        .mount(&store.server)
        .await;

    store.cart.refresh().await;
    assert_eq!(store.cart.items().len(), 1);

    // The backend starts failing; the refresh is swallowed and the stale
    // snapshot survives.
    Mock::given(method("GET"))
        .and(path("/cart/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart/total/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&store.server)
        .await;

    store.cart.refresh().await;

    assert_eq!(store.cart.items().len(), 1);
    assert!(store.cart.total().is_some());
    assert!(store.notifier.errors().is_empty(), "refresh failures are not notified");
}

#[tokio::test]
async fn clear_resets_locally_without_refetch() {
    let store = TestStore::start_signed_in().await;
    let mug = product_json(3, "Enamel Mug", "14.50");

    Mock::given(method("GET"))
        .and(path("/cart/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([
                cart_item_json(21, &mug, 1)
            ])),
        )
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart/total/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_total_json("14.50", 1, 1)))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/cart/clear/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&store.server)
        .await;

    store.cart.refresh().await;
    assert!(!store.cart.is_empty());

    store.cart.clear().await.expect("clear should succeed");

    // Local reset, and the expect(1) on the GET mocks verifies no refetch.
    assert!(store.cart.is_empty());
    assert!(store.cart.total().is_none());
}

#[tokio::test]
async fn update_and_remove_follow_refetch_after_write() {
    let store = TestStore::start_signed_in().await;
    let mug = product_json(3, "Enamel Mug", "14.50");

    Mock::given(method("PUT"))
        .and(path("/cart/21/"))
        .and(body_json(serde_json::json!({ "quantity": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_item_json(21, &mug, 3)))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/cart/21/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&store.server)
        .await;

    // Refetch after the update reports quantity 3; after the remove, empty.
    Mock::given(method("GET"))
        .and(path("/cart/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([
                cart_item_json(21, &mug, 3)
            ])),
        )
        .up_to_n_times(1)
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart/total/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_total_json("43.50", 3, 1)))
        .up_to_n_times(1)
        .mount(&store.server)
        .await;

    store
        .cart
        .update_item(CartItemId::new(21), 3)
        .await
        .expect("update should succeed");
    assert_eq!(store.cart.items()[0].quantity, 3);

    Mock::given(method("GET"))
        .and(path("/cart/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart/total/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_total_json("0.00", 0, 0)))
        .mount(&store.server)
        .await;

    store
        .cart
        .remove_item(CartItemId::new(21))
        .await
        .expect("remove should succeed");
    assert!(store.cart.is_empty());

    assert_eq!(
        store.notifier.successes(),
        vec![
            "Cart updated!".to_string(),
            "Item removed from cart!".to_string()
        ]
    );
}

//! Session store scenarios: login, registration, logout, startup restore.

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use copperleaf_core::{LoginCredentials, RegisterCredentials, UserId};
use copperleaf_integration_tests::{Notice, TestStore, access_token_with_names};
use copperleaf_storefront::auth::TokenStore;
use copperleaf_storefront::services::AuthError;

#[tokio::test]
async fn login_with_valid_credentials_derives_user_from_token() {
    let store = TestStore::start().await;
    let token = access_token_with_names(7, "jwatson", "john@example.com", "John", "Watson");

    Mock::given(method("POST"))
        .and(path("/token/"))
        .and(body_json(serde_json::json!({
            "username": "jwatson",
            "password": "hunter2!",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": token,
            "refresh": "refresh-1",
        })))
        .expect(1)
        .mount(&store.server)
        .await;

    store
        .session
        .login(&LoginCredentials {
            username: "jwatson".to_string(),
            password: "hunter2!".to_string(),
        })
        .await
        .expect("login should succeed");

    assert!(store.session.is_authenticated());

    let user = store.session.user().expect("user should be set");
    assert_eq!(user.id, UserId::new(7));
    assert_eq!(user.username, "jwatson");
    assert_eq!(user.email, "john@example.com");
    assert_eq!(user.first_name, "John");
    assert_eq!(user.last_name, "Watson");

    // Both tokens persisted under the fixed keys.
    let persisted = store.tokens.load().expect("tokens should be persisted");
    assert_eq!(persisted.access_token, token);
    assert_eq!(persisted.refresh_token, "refresh-1");

    assert_eq!(
        store.notifier.successes(),
        vec!["Login successful!".to_string()]
    );
}

#[tokio::test]
async fn login_with_invalid_credentials_surfaces_auth_error() {
    let store = TestStore::start().await;

    Mock::given(method("POST"))
        .and(path("/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "No active account found with the given credentials",
        })))
        .expect(1)
        .mount(&store.server)
        .await;

    let err = store
        .session
        .login(&LoginCredentials {
            username: "jwatson".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .expect_err("login should fail");

    assert!(matches!(err, AuthError::Rejected { .. }));
    assert!(!store.session.is_authenticated());
    assert!(store.tokens.load().is_none());

    // The backend's detail is the one notification.
    assert_eq!(
        store.notifier.notices(),
        vec![Notice::Error(
            "No active account found with the given credentials".to_string()
        )]
    );
}

#[tokio::test]
async fn register_follows_the_login_contract() {
    let store = TestStore::start().await;
    let token = access_token_with_names(9, "wmorstan", "mary@example.com", "Mary", "Morstan");

    Mock::given(method("POST"))
        .and(path("/register/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "access": token,
            "refresh": "refresh-9",
        })))
        .expect(1)
        .mount(&store.server)
        .await;

    store
        .session
        .register(&RegisterCredentials {
            username: "wmorstan".to_string(),
            email: "mary@example.com".to_string(),
            password: "hunter2!".to_string(),
            first_name: "Mary".to_string(),
            last_name: "Morstan".to_string(),
        })
        .await
        .expect("registration should succeed");

    let user = store.session.user().expect("user should be set");
    assert_eq!(user.username, "wmorstan");
    assert_eq!(
        store.notifier.successes(),
        vec!["Registration successful!".to_string()]
    );
}

#[tokio::test]
async fn startup_with_undecodable_token_discards_both_tokens() {
    let store = TestStore::start_with_tokens("garbage-token", "refresh-1").await;

    assert!(!store.session.is_authenticated());
    assert!(store.session.user().is_none());
    assert!(
        store.tokens.load().is_none(),
        "both persisted tokens should be removed"
    );
}

#[tokio::test]
async fn startup_with_decodable_token_restores_without_network() {
    let store = TestStore::start_signed_in().await;
    assert!(store.session.is_authenticated());
    assert_eq!(
        store.session.user().expect("user should be set").username,
        "jwatson"
    );
    assert_eq!(store.server.received_requests().await.unwrap_or_default().len(), 0);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let store = TestStore::start_signed_in().await;
    assert!(store.session.is_authenticated());

    store.session.logout();
    assert!(!store.session.is_authenticated());
    assert!(store.tokens.load().is_none());

    store.session.logout();
    assert!(!store.session.is_authenticated());

    assert_eq!(
        store.notifier.successes(),
        vec![
            "Logged out successfully".to_string(),
            "Logged out successfully".to_string()
        ]
    );
}

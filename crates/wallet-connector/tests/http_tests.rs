/*
[INPUT]:  Mock REST auth service and on-disk credential files
[OUTPUT]: Test results for HTTP-backed connector sessions
[POS]:    Integration tests - HTTP auth backend and session persistence
[UPDATE]: When auth endpoints or the stored session format change
*/

mod common;

use std::sync::Arc;

use common::{TEST_ADDRESS, TEST_CLIENT_ID, TEST_EMAIL, setup_mock_server, test_options};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wallet_connector::backend::MockSignerBackend;
use wallet_connector::{
    ConnectorError, CredentialStore, EmbeddedWalletConnector, FileCredentialStore,
    HttpAuthBackend, LoginRequest, OauthProvider,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn temp_store() -> Arc<FileCredentialStore> {
    let dir = std::env::temp_dir().join(format!("wallet-connector-it-{}", uuid::Uuid::new_v4()));
    Arc::new(FileCredentialStore::new(dir.join("session.json")))
}

fn connector(base_url: &str, store: Arc<FileCredentialStore>) -> EmbeddedWalletConnector {
    let auth = Arc::new(assert_ok!(HttpAuthBackend::new(base_url)));
    let signers = Arc::new(MockSignerBackend::new(TEST_ADDRESS));
    assert_ok!(EmbeddedWalletConnector::new(test_options(), auth, signers, store))
}

#[tokio::test]
async fn test_jwt_connect_persists_and_resumes() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/jwt"))
        .and(body_json(json!({
            "jwt": "abc",
            "password": null,
            "clientId": TEST_CLIENT_ID,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": TEST_EMAIL })))
        .expect(1)
        .mount(&server)
        .await;

    let store = temp_store();
    let first = connector(&server.uri(), store.clone());
    let address = assert_ok!(first.connect(LoginRequest::jwt("abc", None), None).await);
    assert_eq!(address, TEST_ADDRESS);
    assert_eq!(assert_ok!(store.load()).as_deref(), Some(TEST_EMAIL));

    // a new process picks the identity up from disk
    let second = connector(&server.uri(), store.clone());
    assert_eq!(second.get_email().as_deref(), Some(TEST_EMAIL));
    assert!(second.is_connected().await);

    let _ = std::fs::remove_dir_all(store.path().parent().unwrap());
}

#[tokio::test]
async fn test_otp_flow_over_http() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/otp/send"))
        .and(body_json(json!({ "email": TEST_EMAIL, "clientId": TEST_CLIENT_ID })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/otp/verify"))
        .and(body_json(json!({
            "email": TEST_EMAIL,
            "otp": "123456",
            "clientId": TEST_CLIENT_ID,
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = temp_store();
    let connector = connector(&server.uri(), store.clone());
    assert_ok!(connector.send_email_otp(TEST_EMAIL).await);
    assert_ok!(connector.connect(LoginRequest::otp("123456"), None).await);
    assert_eq!(connector.get_email().as_deref(), Some(TEST_EMAIL));

    let _ = std::fs::remove_dir_all(store.path().parent().unwrap());
}

#[tokio::test]
async fn test_rejected_social_login_keeps_disconnected() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/oauth/apple"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid grant"))
        .mount(&server)
        .await;

    let store = temp_store();
    let connector = connector(&server.uri(), store.clone());
    let err = assert_err!(
        connector
            .connect(
                LoginRequest::social(OauthProvider::Apple, Some("https://app/cb".into())),
                None
            )
            .await
    );

    match err {
        ConnectorError::AuthenticationFailed(message) => {
            assert!(message.contains("401"), "unexpected message: {message}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!connector.is_connected().await);
    assert_eq!(assert_ok!(store.load()), None);
}

#[tokio::test]
async fn test_disconnect_calls_logout_and_removes_file() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": TEST_EMAIL })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .and(body_json(json!({ "clientId": TEST_CLIENT_ID })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = temp_store();
    let connector = connector(&server.uri(), store.clone());
    assert_ok!(connector.connect(LoginRequest::jwt("abc", None), None).await);
    assert!(store.path().exists());

    assert_ok!(connector.disconnect().await);
    assert!(!store.path().exists());
    assert!(!connector.is_connected().await);

    let _ = std::fs::remove_dir_all(store.path().parent().unwrap());
}

#[tokio::test]
async fn test_failed_logout_still_tears_down() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": TEST_EMAIL })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = temp_store();
    let connector = connector(&server.uri(), store.clone());
    assert_ok!(connector.connect(LoginRequest::jwt("abc", None), None).await);

    let err = assert_err!(connector.disconnect().await);
    assert!(matches!(err, ConnectorError::Api { code: 503, .. }));
    assert!(connector.get_email().is_none());
    assert!(!connector.is_connected().await);

    let _ = std::fs::remove_dir_all(store.path().parent().unwrap());
}

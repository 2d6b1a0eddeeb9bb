//! Session lifecycle against the fake server.

use acslib::{CcureConfig, ErrorKind, SessionConnection};

use crate::common::FakeCcure;

#[tokio::test]
async fn test_login_keepalive_logout() {
    let fake = FakeCcure::start().await;
    let connection = fake.connection();

    let token = connection.login().await.unwrap();
    assert!(token.starts_with("session-"));
    assert!(connection.is_authenticated().await);

    connection.keepalive().await.unwrap();
    assert_eq!(connection.session_id().await.unwrap(), token);

    connection.logout().await;
    assert!(!connection.is_authenticated().await);
    assert_eq!(fake.logins(), 1);
}

#[tokio::test]
async fn test_keepalive_after_expiry_clears_session_then_recovers() {
    let fake = FakeCcure::start().await;
    let connection = fake.connection();
    connection.login().await.unwrap();

    fake.expire_sessions();
    let err = connection.keepalive().await.unwrap_err();
    assert!(err.is_session_expired());
    assert!(!connection.is_authenticated().await);

    // The next keepalive logs in again.
    connection.keepalive().await.unwrap();
    assert_eq!(fake.logins(), 2);
}

#[tokio::test]
async fn test_wrong_password_is_login_failed() {
    let fake = FakeCcure::start().await;
    let config = CcureConfig::new(fake.server.uri(), "svc-acslib", "wrong")
        .with_client("acslib-integration", "1.0", "4f1c2a9e");
    let connection = SessionConnection::new(config).unwrap();

    let err = connection.login().await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LoginFailed { status: 401, .. }));
    assert!(!connection.is_authenticated().await);
}

#[tokio::test]
async fn test_versions() {
    let fake = FakeCcure::start().await;
    let versions = fake.connection().versions().await.unwrap();
    assert_eq!(versions.web_service_version.as_deref(), Some("3.0.1"));
}

//! Session load/create/recovery behavior against the mock client.

use std::path::PathBuf;

use tempfile::TempDir;

use libskycast::client::mock::MockClient;
use libskycast::{
    guest_session, ClientError, GuestCredentials, SessionConfig, SessionError, SessionManager,
    SkycastError,
};

fn config_at(path: PathBuf) -> SessionConfig {
    SessionConfig {
        identifier: "user.bsky.social".to_string(),
        password: "app-pass".to_string(),
        session_file: path,
    }
}

#[tokio::test]
async fn missing_file_triggers_one_login_and_one_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bsky_session.json");
    let mock = MockClient::new().with_exported(r#"{"fresh":"token"}"#);

    let mut manager = SessionManager::new(mock.clone(), config_at(path.clone()));
    manager.load_or_create().await.unwrap();

    // The file never existed, so the client was never asked to resume.
    assert_eq!(mock.resume_calls(), 0);
    assert_eq!(mock.login_calls(), 1);
    assert_eq!(
        mock.logins(),
        vec![("user.bsky.social".to_string(), "app-pass".to_string())]
    );
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"fresh":"token"}"#
    );
}

#[tokio::test]
async fn valid_file_resumes_without_login() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bsky_session.json");
    std::fs::write(&path, r#"{"saved":"token"}"#).unwrap();
    let mock = MockClient::new();

    let mut manager = SessionManager::new(mock.clone(), config_at(path.clone()));
    manager.load_or_create().await.unwrap();

    assert_eq!(mock.resume_calls(), 1);
    assert_eq!(mock.resumed_with(), vec![r#"{"saved":"token"}"#.to_string()]);
    assert_eq!(mock.login_calls(), 0);
    // The stored token is left as-is.
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"saved":"token"}"#
    );
}

#[tokio::test]
async fn rejected_token_falls_back_and_rewrites_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bsky_session.json");
    std::fs::write(&path, r#"{"stale":"token"}"#).unwrap();
    let mock = MockClient::failing_resume(ClientError::BadRequest("ExpiredToken".to_string()))
        .with_exported(r#"{"fresh":"token"}"#);

    let mut manager = SessionManager::new(mock.clone(), config_at(path.clone()));
    manager.load_or_create().await.unwrap();

    assert_eq!(mock.resume_calls(), 1);
    assert_eq!(mock.login_calls(), 1);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"fresh":"token"}"#
    );
}

#[tokio::test]
async fn malformed_token_falls_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bsky_session.json");
    std::fs::write(&path, "not even json").unwrap();
    let mock =
        MockClient::failing_resume(ClientError::InvalidSession("expected value".to_string()));

    let mut manager = SessionManager::new(mock.clone(), config_at(path));
    manager.load_or_create().await.unwrap();

    assert_eq!(mock.resume_calls(), 1);
    assert_eq!(mock.login_calls(), 1);
}

#[tokio::test]
async fn network_error_during_resume_propagates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bsky_session.json");
    std::fs::write(&path, r#"{"saved":"token"}"#).unwrap();
    let mock =
        MockClient::failing_resume(ClientError::Network("connection refused".to_string()));

    let mut manager = SessionManager::new(mock.clone(), config_at(path));
    let result = manager.load_or_create().await;

    assert!(matches!(
        result,
        Err(SkycastError::Client(ClientError::Network(_)))
    ));
    // No silent fallback for non-recoverable failures.
    assert_eq!(mock.login_calls(), 0);
}

#[tokio::test]
async fn rate_limit_during_resume_propagates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bsky_session.json");
    std::fs::write(&path, r#"{"saved":"token"}"#).unwrap();
    let mock = MockClient::failing_resume(ClientError::RateLimit("slow down".to_string()));

    let mut manager = SessionManager::new(mock.clone(), config_at(path));
    let result = manager.load_or_create().await;

    assert!(matches!(
        result,
        Err(SkycastError::Client(ClientError::RateLimit(_)))
    ));
    assert_eq!(mock.login_calls(), 0);
}

#[tokio::test]
async fn unreadable_file_propagates_without_fallback() {
    // Pointing the session file at a directory yields an io error that is
    // not NotFound; that must not be treated as a missing session.
    let dir = TempDir::new().unwrap();
    let mock = MockClient::new();

    let mut manager = SessionManager::new(mock.clone(), config_at(dir.path().to_path_buf()));
    let result = manager.load_or_create().await;

    match result {
        Err(SkycastError::Session(SessionError::Read { source, .. })) => {
            assert_ne!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected a read error, got {:?}", other),
    }
    assert_eq!(mock.login_calls(), 0);
    assert_eq!(mock.resume_calls(), 0);
}

#[tokio::test]
async fn login_failure_propagates_from_fallback() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bsky_session.json");
    let mock =
        MockClient::failing_login(ClientError::Authentication("bad app password".to_string()));

    let mut manager = SessionManager::new(mock.clone(), config_at(path.clone()));
    let result = manager.load_or_create().await;

    assert!(matches!(
        result,
        Err(SkycastError::Client(ClientError::Authentication(_)))
    ));
    // Login failed, so nothing was persisted.
    assert!(!path.exists());
}

#[tokio::test]
async fn create_session_write_failure_surfaces() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing-subdir").join("bsky_session.json");
    let mock = MockClient::new();

    let mut manager = SessionManager::new(mock.clone(), config_at(path));
    let result = manager.create_session().await;

    assert!(matches!(
        result,
        Err(SkycastError::Session(SessionError::Write { .. }))
    ));
    assert_eq!(mock.login_calls(), 1);
}

#[tokio::test]
async fn export_session_passes_through() {
    let dir = TempDir::new().unwrap();
    let mock = MockClient::new().with_exported(r#"{"current":"token"}"#);

    let manager = SessionManager::new(
        mock,
        config_at(dir.path().join("bsky_session.json")),
    );
    assert_eq!(
        manager.export_session().await.unwrap(),
        r#"{"current":"token"}"#
    );
}

#[tokio::test]
async fn guest_session_resumes_supplied_token() {
    let mut mock = MockClient::new();
    let handle = mock.clone();

    guest_session(
        &mut mock,
        Some(r#"{"guest":"token"}"#),
        &GuestCredentials {
            identifier: "guest.bsky.social".to_string(),
            password: "guest-pass".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(handle.resume_calls(), 1);
    assert_eq!(handle.login_calls(), 0);
}

#[tokio::test]
async fn guest_session_falls_back_to_credentials() {
    let mut mock = MockClient::failing_resume(ClientError::BadRequest("ExpiredToken".to_string()));
    let handle = mock.clone();

    guest_session(
        &mut mock,
        Some(r#"{"guest":"token"}"#),
        &GuestCredentials {
            identifier: "guest.bsky.social".to_string(),
            password: "guest-pass".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(handle.resume_calls(), 1);
    assert_eq!(handle.login_calls(), 1);
    assert_eq!(
        handle.logins(),
        vec![("guest.bsky.social".to_string(), "guest-pass".to_string())]
    );
}

#[tokio::test]
async fn guest_session_without_token_logs_in_directly() {
    let mut mock = MockClient::new();
    let handle = mock.clone();

    guest_session(
        &mut mock,
        None,
        &GuestCredentials {
            identifier: "guest.bsky.social".to_string(),
            password: "guest-pass".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(handle.resume_calls(), 0);
    assert_eq!(handle.login_calls(), 1);
}

#[tokio::test]
async fn guest_session_propagates_non_recoverable_resume_errors() {
    let mut mock = MockClient::failing_resume(ClientError::Network("dns failure".to_string()));
    let handle = mock.clone();

    let result = guest_session(
        &mut mock,
        Some(r#"{"guest":"token"}"#),
        &GuestCredentials {
            identifier: "guest.bsky.social".to_string(),
            password: "guest-pass".to_string(),
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(SkycastError::Client(ClientError::Network(_)))
    ));
    assert_eq!(handle.login_calls(), 0);
}

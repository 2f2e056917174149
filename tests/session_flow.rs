mod common;

use anyhow::{anyhow, Result};
use common::{can_bind_localhost, profile, Harness};
use goldenlock::{
    navigation::Route,
    notify::NotificationKind,
    pipeline::{NETWORK_ERROR, REQUEST_FAILED, SESSION_EXPIRED},
    session::{Role, UserSession},
};
use secrecy::SecretString;
use serde_json::json;
use std::net::TcpListener;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn ada(role: Role) -> UserSession {
    UserSession {
        email: "ada@example.com".to_string(),
        username: Some("ada".to_string()),
        role,
    }
}

#[tokio::test]
async fn login_stores_session_and_keeps_cookie() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "hunter22!"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sessionid=abc123; Path=/; HttpOnly")
                .set_body_json(json!({
                    "email": "ada@example.com",
                    "username": "ada",
                    "role": "admin",
                    "access": "ignored"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/profile/"))
        .and(header("cookie", "sessionid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile("admin")))
        .expect(1)
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri(), Route::Login)?;
    let password = SecretString::from("hunter22!".to_string());

    let response = harness
        .service
        .login(" ada@example.com ", &password)
        .await?;
    assert_eq!(response.role, Role::Admin);
    assert_eq!(harness.service.session().get(), Some(ada(Role::Admin)));

    let me = harness.service.profile().await?;
    assert_eq!(me.email, "ada@example.com");
    assert!(harness.toasts().is_empty());
    Ok(())
}

#[tokio::test]
async fn login_failure_toasts_detail_once() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["Invalid credentials"]
        })))
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri(), Route::Login)?;
    let password = SecretString::from("wrong-pass".to_string());

    let err = harness
        .service
        .login("ada@example.com", &password)
        .await
        .err()
        .ok_or_else(|| anyhow!("expected error"))?;

    assert_eq!(err.status(), Some(400));
    assert_eq!(harness.messages(), vec!["Invalid credentials".to_string()]);
    assert_eq!(harness.toasts()[0].kind, NotificationKind::Error);
    assert!(!harness.service.session().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn logout_after_expiry_is_silent() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri(), Route::Dashboard)?;
    harness.service.session().set(ada(Role::User));

    harness.service.logout().await?;

    assert!(harness.service.session().get().is_none());
    assert!(harness.toasts().is_empty());
    // the tolerant call leaves navigation to the caller
    assert_eq!(harness.navigator.current(), Route::Dashboard);
    Ok(())
}

#[tokio::test]
async fn logout_server_error_still_clears_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri(), Route::Dashboard)?;
    harness.service.session().set(ada(Role::User));

    let result = harness.service.logout().await;

    assert_eq!(result.err().and_then(|err| err.status()), Some(500));
    assert!(harness.service.session().get().is_none());
    assert_eq!(harness.messages(), vec![REQUEST_FAILED.to_string()]);
    Ok(())
}

#[tokio::test]
async fn unauthorized_call_redirects_and_toasts_once() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/login-history/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri(), Route::Dashboard)?;

    let result = harness.service.login_history().await;

    assert!(result.is_err());
    assert_eq!(harness.navigator.current(), Route::Login);
    assert_eq!(harness.messages(), vec![SESSION_EXPIRED.to_string()]);
    Ok(())
}

#[tokio::test]
async fn expired_session_clears_cached_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri(), Route::Profile)?;
    harness.service.session().set(ada(Role::Admin));

    let err = harness
        .service
        .profile()
        .await
        .err()
        .ok_or_else(|| anyhow!("expected error"))?;

    assert!(err.is_unauthorized());
    assert!(harness.service.session().get().is_none());
    assert_eq!(harness.navigator.current(), Route::Login);
    assert_eq!(harness.messages(), vec![SESSION_EXPIRED.to_string()]);
    Ok(())
}

#[tokio::test]
async fn init_restores_session_from_profile() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile("user")))
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri(), Route::Login)?;
    let session = harness.service.session();

    let restored = session.init(harness.service.api()).await?;

    assert_eq!(restored, Some(ada(Role::User)));
    assert_eq!(session.role(), Some(Role::User));
    Ok(())
}

#[tokio::test]
async fn init_without_cookie_is_silent() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri(), Route::Register)?;
    let session = harness.service.session();
    session.set(ada(Role::Admin));

    let restored = session.init(harness.service.api()).await?;

    assert_eq!(restored, None);
    assert!(!session.is_authenticated());
    assert!(harness.toasts().is_empty());
    assert_eq!(harness.navigator.current(), Route::Register);
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
    let harness = Harness::new(&format!("http://127.0.0.1:{port}"), Route::Dashboard)?;

    let err = harness
        .service
        .profile()
        .await
        .err()
        .ok_or_else(|| anyhow!("expected error"))?;

    assert!(err.is_transport());
    assert_eq!(harness.messages(), vec![NETWORK_ERROR.to_string()]);
    assert_eq!(harness.navigator.current(), Route::Dashboard);
    Ok(())
}

#[tokio::test]
async fn truncated_body_is_a_network_error() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    // headers promise 100 bytes, then the connection drops after one
    let server = tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0_u8; 1024];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{",
                )
                .await;
            let _ = socket.shutdown().await;
        }
    });

    let harness = Harness::new(&format!("http://127.0.0.1:{port}"), Route::Profile)?;

    let err = harness
        .service
        .profile()
        .await
        .err()
        .ok_or_else(|| anyhow!("expected error"))?;
    server.await?;

    assert!(err.is_transport());
    assert_eq!(harness.messages(), vec![NETWORK_ERROR.to_string()]);
    assert_eq!(harness.navigator.current(), Route::Profile);
    Ok(())
}

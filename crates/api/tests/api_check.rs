//! Root endpoint check against an in-process mock server

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use smoke_api::{ApiCheck, ApiCheckConfig};
use smoke_common::{AssertionFailure, ErrorKind};
use tokio::net::TcpListener;

/// Serve `GET /` with a fixed status and body on a free local port
async fn spawn_root(status: StatusCode, body: &'static str) -> SocketAddr {
    let app = Router::new().route("/", get(move || async move { (status, body) }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn check_for(addr: SocketAddr) -> ApiCheck {
    ApiCheck::new(ApiCheckConfig {
        base_url: format!("http://{}", addr),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn healthy_root_passes() {
    let addr = spawn_root(StatusCode::OK, "OK").await;

    let record = check_for(addr).run().await.unwrap();

    assert_eq!(record.status, 200);
    assert_eq!(record.body, "OK");
}

#[tokio::test]
async fn empty_body_fails_body_assertion() {
    let addr = spawn_root(StatusCode::OK, "").await;

    let err = check_for(addr).run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Assertion);
    assert_eq!(err.failures(), &[AssertionFailure::EmptyBody]);
}

#[tokio::test]
async fn unavailable_fails_status_assertion() {
    let addr = spawn_root(StatusCode::SERVICE_UNAVAILABLE, "unavailable").await;

    let err = check_for(addr).run().await.unwrap_err();

    assert_eq!(
        err.failures(),
        &[AssertionFailure::StatusMismatch {
            expected: 200,
            actual: 503
        }]
    );
}

#[tokio::test]
async fn error_status_with_empty_body_reports_both() {
    let addr = spawn_root(StatusCode::INTERNAL_SERVER_ERROR, "").await;

    let err = check_for(addr).run().await.unwrap_err();

    assert_eq!(err.failures().len(), 2);
}

#[tokio::test]
async fn fetch_root_does_not_judge() {
    let addr = spawn_root(StatusCode::SERVICE_UNAVAILABLE, "unavailable").await;

    let record = check_for(addr).fetch_root().await.unwrap();

    assert_eq!(record.status, 503);
}

#[tokio::test]
async fn unreachable_server_is_a_remote_failure() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = check_for(addr).run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteService);
}

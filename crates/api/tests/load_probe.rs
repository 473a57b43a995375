//! Load probe runs against an in-process mock server with a compressed profile

use std::io::Write;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use flate2::write::GzEncoder;
use flate2::Compression;
use smoke_api::load::{LoadConfig, LoadProbe, LoadProfile, Stage};
use smoke_common::ErrorKind;
use tokio::net::TcpListener;

struct MockPage {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

async fn spawn_page(status: StatusCode, require_agent: bool) -> MockPage {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let app = Router::new().route(
        "/web/index.php/auth/login",
        get(move |headers: HeaderMap| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if require_agent && !headers.contains_key("sec-fetch-mode") {
                    return (StatusCode::BAD_REQUEST, "missing browser headers");
                }
                (status, "<html>login</html>")
            }
        }),
    );

    MockPage {
        addr: serve(app).await,
        hits,
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn short_config(addr: SocketAddr) -> LoadConfig {
    let mut config = LoadConfig::new(
        format!("http://{}/web/index.php/auth/login", addr),
        3,
        Duration::from_millis(400),
    );
    config.profile = LoadProfile::new(vec![
        Stage::new(Duration::from_millis(200), 3),
        Stage::new(Duration::from_millis(400), 3),
        Stage::new(Duration::from_millis(200), 0),
    ]);
    config.think_time = Duration::from_millis(20);
    config
}

#[tokio::test]
async fn healthy_page_meets_thresholds() {
    let page = spawn_page(StatusCode::OK, true).await;

    let probe = LoadProbe::new(short_config(page.addr)).unwrap();
    let summary = probe.run().await.unwrap();

    assert!(summary.total_requests > 0);
    assert_eq!(summary.total_requests as usize, page.hits.load(Ordering::SeqCst));
    assert_eq!(summary.failed_requests, 0);
    assert_eq!(summary.success_rate, 1.0);
    assert!(summary.passed(), "{}", summary.render());
}

#[tokio::test]
async fn failing_page_crosses_failure_rate() {
    let page = spawn_page(StatusCode::INTERNAL_SERVER_ERROR, false).await;

    let probe = LoadProbe::new(short_config(page.addr)).unwrap();
    let summary = probe.run().await.unwrap();

    assert!(summary.total_requests > 0);
    assert_eq!(summary.failed_requests, summary.total_requests);
    let err = summary.ensure_passed().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Assertion);
    assert!(err.to_string().contains("http_req_failed"));
}

#[tokio::test]
async fn compressed_page_is_decoded_before_checks() {
    const PAGE: &str = "<html>login</html>";

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(PAGE.as_bytes()).unwrap();
    let gzipped = encoder.finish().unwrap();

    let app = Router::new().route(
        "/web/index.php/auth/login",
        get(move || {
            let gzipped = gzipped.clone();
            async move { ([(header::CONTENT_ENCODING, "gzip")], gzipped) }
        }),
    );
    let addr = serve(app).await;

    let summary = LoadProbe::new(short_config(addr)).unwrap().run().await.unwrap();

    assert!(summary.total_requests > 0);
    assert_eq!(summary.failed_requests, 0);
    assert_eq!(summary.bytes_received, summary.total_requests * PAGE.len() as u64);
}

#[tokio::test]
async fn slow_page_times_out_when_timeout_is_set() {
    let app = Router::new().route(
        "/web/index.php/auth/login",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            "<html>login</html>"
        }),
    );
    let addr = serve(app).await;

    let mut config = short_config(addr);
    config.request_timeout = Some(Duration::from_millis(50));
    let summary = LoadProbe::new(config).unwrap().run().await.unwrap();

    assert!(summary.total_requests > 0);
    assert_eq!(summary.failed_requests, summary.total_requests);
    assert!(!summary.passed());
}

#[test]
fn rejects_invalid_header() {
    let mut config = LoadConfig::default();
    config.headers.push(("bad header".into(), "x".into()));

    let err = LoadProbe::new(config).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Local);
}

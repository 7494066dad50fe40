//! Integration tests for the fetcher chain against a local HTTP gateway
//! and an on-disk mirror.

use async_trait::async_trait;
use axum::{Router, http::StatusCode, routing::get};
use distfetch::config::{Config, FetchConfig};
use distfetch::dist::{CURRENT_IPFS_DIST, IPNS_IPFS_DIST};
use distfetch::fetch::{
    self, BoxReadCloser, FetchContext, FetchError, Fetcher, FileFetcher, HttpConfig, HttpFetcher,
    LimitReadCloser, MultiFetcher, ReadCloser,
};
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

/// Serves a tiny distribution tree on an ephemeral port, returns its base URL
async fn spawn_gateway() -> String {
    let app = Router::new()
        .route(
            "/ipns/dist.ipfs.io/go-ipfs/versions",
            get(|| async { "v0.4.0\nv0.5.0\n" }),
        )
        .route("/ipfs/Qm123/hello", get(|| async { "hello" }))
        .route(
            "/ipns/dist.ipfs.io/big",
            get(|| async { "x".repeat(64 * 1024) }),
        )
        .route(
            "/ipns/dist.ipfs.io/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/ipns/dist.ipfs.io/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test gateway");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn gateway_fetcher(base: &str) -> Box<dyn Fetcher> {
    Box::new(HttpFetcher::new(base, &HttpConfig::default()).unwrap())
}

/// Backend that only counts how often it was asked
struct CountingFetcher {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, _ctx: &FetchContext, path: &str) -> fetch::Result<BoxReadCloser> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::NotFound(path.to_string()))
    }

    fn set_dist_path(&mut self, _dist_path: &str) {}
}

async fn read_to_string(mut stream: BoxReadCloser) -> String {
    let mut out = String::new();
    stream.read_to_string(&mut out).await.unwrap();
    stream.close().unwrap();
    out
}

#[tokio::test]
async fn test_gateway_fetch_default_dist() {
    let base = spawn_gateway().await;
    let fetcher = MultiFetcher::new([gateway_fetcher(&base)]);

    let stream = fetcher
        .fetch(&FetchContext::new(), "go-ipfs/versions")
        .await
        .unwrap();
    assert_eq!(read_to_string(stream).await, "v0.4.0\nv0.5.0\n");
}

#[tokio::test]
async fn test_failing_mirror_falls_through_to_gateway() {
    let base = spawn_gateway().await;
    let empty_mirror = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let mut fetcher = MultiFetcher::new([
        Box::new(FileFetcher::new(empty_mirror.path())) as Box<dyn Fetcher>,
        gateway_fetcher(&base),
        Box::new(CountingFetcher {
            calls: calls.clone(),
        }),
    ]);
    fetcher.set_dist_path("ipfs/Qm123");

    let stream = fetcher.fetch(&FetchContext::new(), "hello").await.unwrap();
    assert_eq!(read_to_string(stream).await, "hello");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let snapshot = fetcher.metrics().snapshot();
    assert_eq!(snapshot.attempts, 2);
    assert_eq!(snapshot.failures, 1);
}

#[tokio::test]
async fn test_mirror_hit_skips_gateway() {
    let mirror = TempDir::new().unwrap();
    let file_path = mirror.path().join("ipns/dist.ipfs.io/go-ipfs/versions");
    fs::create_dir_all(file_path.parent().unwrap()).unwrap();
    fs::write(&file_path, "mirrored").unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = MultiFetcher::new([
        Box::new(FileFetcher::new(mirror.path())) as Box<dyn Fetcher>,
        Box::new(CountingFetcher {
            calls: calls.clone(),
        }),
    ]);

    let stream = fetcher
        .fetch(&FetchContext::new(), "go-ipfs/versions")
        .await
        .unwrap();
    assert_eq!(read_to_string(stream).await, "mirrored");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_mirror_directory_falls_through_to_gateway() {
    let base = spawn_gateway().await;
    let mirror = TempDir::new().unwrap();
    fs::create_dir_all(mirror.path().join("ipns/dist.ipfs.io/go-ipfs/versions")).unwrap();

    let fetcher = MultiFetcher::new([
        Box::new(FileFetcher::new(mirror.path())) as Box<dyn Fetcher>,
        gateway_fetcher(&base),
    ]);

    let stream = fetcher
        .fetch(&FetchContext::new(), "go-ipfs/versions")
        .await
        .unwrap();
    assert_eq!(read_to_string(stream).await, "v0.4.0\nv0.5.0\n");
    assert_eq!(fetcher.metrics().snapshot().failures, 1);
}

#[tokio::test]
async fn test_gateway_errors_surface_last_backend() {
    let base = spawn_gateway().await;
    let fetcher = MultiFetcher::new([gateway_fetcher(&base), gateway_fetcher(&base)]);

    let err = fetcher
        .fetch(&FetchContext::new(), "broken")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 500, .. }));

    let err = fetcher
        .fetch(&FetchContext::new(), "missing")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound(ref url) if url.ends_with("/missing")));
}

#[tokio::test]
async fn test_gateway_body_capped_by_limit() {
    let base = spawn_gateway().await;
    let gateway = HttpFetcher::new(base.as_str(), &HttpConfig::default())
        .unwrap()
        .with_limit(1000);

    let stream = gateway.fetch(&FetchContext::new(), "big").await.unwrap();
    assert_eq!(read_to_string(stream).await.len(), 1000);
}

#[tokio::test]
async fn test_caller_side_limit_on_fetched_stream() {
    let base = spawn_gateway().await;
    let fetcher = MultiFetcher::new([gateway_fetcher(&base)]);

    let stream = fetcher.fetch(&FetchContext::new(), "big").await.unwrap();
    let mut reader = LimitReadCloser::new(stream, 10);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).await.unwrap();
    reader.close().unwrap();

    assert_eq!(out, b"xxxxxxxxxx");
}

#[tokio::test]
async fn test_deadline_interrupts_slow_gateway() {
    let base = spawn_gateway().await;
    let fetcher = MultiFetcher::new([gateway_fetcher(&base)]);
    let ctx = FetchContext::with_timeout(Duration::from_millis(100));

    let err = fetcher.fetch(&ctx, "slow").await.unwrap_err();
    assert!(matches!(err, FetchError::DeadlineExceeded));
}

#[tokio::test]
async fn test_cancel_interrupts_slow_gateway() {
    let base = spawn_gateway().await;
    let fetcher = MultiFetcher::new([gateway_fetcher(&base)]);
    let ctx = FetchContext::new();

    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = fetcher.fetch(&ctx, "slow").await.unwrap_err();
    assert!(matches!(err, FetchError::Cancelled));
}

#[tokio::test]
async fn test_chain_from_config() {
    let base = spawn_gateway().await;
    let config = Config {
        fetch: FetchConfig {
            gateways: vec!["http://127.0.0.1:9".to_string(), base],
            ..FetchConfig::default()
        },
        ..Config::default()
    };

    let fetcher = fetch::from_config(&config, "ipfs/Qm123").unwrap();
    assert_eq!(fetcher.len(), 2);

    let stream = fetcher.fetch(&FetchContext::new(), "hello").await.unwrap();
    assert_eq!(read_to_string(stream).await, "hello");
}

#[test]
fn test_dist_constants() {
    assert!(CURRENT_IPFS_DIST.starts_with("/ipfs/"));
    assert_eq!(IPNS_IPFS_DIST, "/ipns/dist.ipfs.io");
}

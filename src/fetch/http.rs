//! HTTP gateway backend

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::{Client, StatusCode};
use std::io;
use std::time::Duration;
use tokio_util::io::StreamReader;
use tracing::debug;

use super::context::FetchContext;
use super::error::{FetchError, Result};
use super::limit::LimitReadCloser;
use super::traits::{BoxReadCloser, Fetcher, ReadCloser};
use crate::dist::IPNS_IPFS_DIST;

/// Default cap on bytes read from a single gateway response (512 MiB)
pub const DEFAULT_FETCH_LIMIT: u64 = 512 * 1024 * 1024;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    /// Longest gap between two reads; the whole transfer is bounded by the fetch deadline instead
    pub read_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
            user_agent: concat!("distfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

type BodyStream = BoxStream<'static, io::Result<Bytes>>;

/// Response body as an async reader
pub type BodyReader = StreamReader<BodyStream, Bytes>;

impl ReadCloser for BodyReader {}

/// Fetches `<gateway><dist_path>/<path>` over HTTP.
///
/// Response bodies are streamed and capped at the configured limit.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    gateway: String,
    dist_path: String,
    limit: u64,
}

impl HttpFetcher {
    /// Gateway fetcher resolving against [`IPNS_IPFS_DIST`] until told otherwise
    pub fn new(gateway: impl Into<String>, config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let gateway = gateway.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            gateway,
            dist_path: IPNS_IPFS_DIST.to_string(),
            limit: DEFAULT_FETCH_LIMIT,
        })
    }

    /// Maximum bytes readable from each fetched body
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    pub fn dist_path(&self) -> &str {
        &self.dist_path
    }

    /// Full URL for a resource under the current distribution root
    pub fn url_for(&self, path: &str) -> String {
        let dist_path = self.dist_path.trim_matches('/');
        let path = path.trim_start_matches('/');
        if dist_path.is_empty() {
            format!("{}/{}", self.gateway, path)
        } else {
            format!("{}/{}/{}", self.gateway, dist_path, path)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, ctx: &FetchContext, path: &str) -> Result<BoxReadCloser> {
        let url = self.url_for(path);
        debug!(%url, "Starting fetch");

        let response = ctx
            .run(async { self.client.get(&url).send().await.map_err(FetchError::from) })
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                url,
                status: status.as_u16(),
            });
        }

        debug!(%url, content_length = ?response.content_length(), "Response headers received");

        // Each chunk is awaited under the context so a stalled body still honors cancellation
        let body: BodyStream = stream::try_unfold(
            (response, ctx.clone()),
            |(mut response, ctx)| async move {
                let chunk = ctx
                    .run(async { response.chunk().await.map_err(FetchError::from) })
                    .await
                    .map_err(io::Error::other)?;
                Ok::<_, io::Error>(chunk.map(|chunk| (chunk, (response, ctx))))
            },
        )
        .boxed();

        let reader = LimitReadCloser::new(StreamReader::new(body), self.limit);
        Ok(Box::new(reader))
    }

    fn set_dist_path(&mut self, dist_path: &str) {
        self.dist_path = dist_path.to_string();
    }
}

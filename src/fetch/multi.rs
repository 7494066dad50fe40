use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::context::FetchContext;
use super::error::{FetchError, Result};
use super::traits::{BoxReadCloser, Fetcher};
use crate::dist::normalize_dist_path;
use crate::observability::FetchMetrics;

/// Fetcher that tries each of its backends in order until one succeeds.
///
/// Backends are moved in at construction and never change afterwards.
/// When every backend fails, the last backend's error is returned; earlier
/// errors are only logged.
pub struct MultiFetcher {
    fetchers: Vec<Box<dyn Fetcher>>,
    metrics: Arc<FetchMetrics>,
}

impl MultiFetcher {
    /// Backends are tried in iteration order
    pub fn new<I>(fetchers: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Fetcher>>,
    {
        Self {
            fetchers: fetchers.into_iter().collect(),
            metrics: Arc::new(FetchMetrics::new()),
        }
    }

    /// Record into a shared metrics handle instead of a private one
    pub fn with_metrics(mut self, metrics: Arc<FetchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<FetchMetrics> {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }
}

impl fmt::Debug for MultiFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiFetcher")
            .field("fetchers", &self.fetchers.len())
            .finish()
    }
}

#[async_trait]
impl Fetcher for MultiFetcher {
    async fn fetch(&self, ctx: &FetchContext, path: &str) -> Result<BoxReadCloser> {
        let mut last_error = None;

        for (index, fetcher) in self.fetchers.iter().enumerate() {
            self.metrics.attempt();
            match fetcher.fetch(ctx, path).await {
                Ok(stream) => {
                    self.metrics.success();
                    debug!(path, index, "Fetched");
                    return Ok(stream);
                }
                Err(e) => {
                    self.metrics.failure();
                    warn!(path, index, error = %e, "Fetcher failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::NoFetchers))
    }

    fn set_dist_path(&mut self, dist_path: &str) {
        let dist_path = normalize_dist_path(dist_path);
        for fetcher in &mut self.fetchers {
            fetcher.set_dist_path(&dist_path);
        }
    }
}

//! Fetching distribution content
//!
//! ## Key Components
//!
//! - [`Fetcher`] - Backend trait: fetch a path under a distribution root
//! - [`MultiFetcher`] - Tries backends in order until one succeeds
//! - [`LimitReadCloser`] - Caps how many bytes can be read from a stream
//! - [`HttpFetcher`] / [`FileFetcher`] - Gateway and local mirror backends
//! - [`FetchContext`] - Cancellation and deadline for a single fetch
//!
//! ## Example
//!
//! ```rust,ignore
//! use distfetch::dist::{dist_path_env, CURRENT_IPFS_DIST};
//! use distfetch::fetch::{FetchContext, Fetcher, HttpConfig, HttpFetcher, MultiFetcher};
//!
//! let gateway = HttpFetcher::new("https://ipfs.io", &HttpConfig::default())?;
//! let mut fetcher = MultiFetcher::new([Box::new(gateway) as Box<dyn Fetcher>]);
//! fetcher.set_dist_path(&dist_path_env(CURRENT_IPFS_DIST));
//!
//! let mut stream = fetcher.fetch(&FetchContext::new(), "go-ipfs/versions").await?;
//! ```

mod context;
mod error;
mod file;
mod http;
mod limit;
mod multi;
mod traits;

pub use context::FetchContext;
pub use error::{FetchError, Result};
pub use file::FileFetcher;
pub use http::{BodyReader, DEFAULT_FETCH_LIMIT, HttpConfig, HttpFetcher};
pub use limit::LimitReadCloser;
pub use multi::MultiFetcher;
pub use traits::{BoxReadCloser, Fetcher, ReadCloser};

use crate::config::Config;

/// Build the backend chain described by configuration.
///
/// The local mirror (if any) is tried first, then each gateway in the
/// order listed. The chain is pointed at `dist_path`.
pub fn from_config(config: &Config, dist_path: &str) -> Result<MultiFetcher> {
    let mut fetchers: Vec<Box<dyn Fetcher>> = Vec::new();

    if let Some(mirror_dir) = &config.fetch.mirror_dir {
        fetchers.push(Box::new(FileFetcher::new(mirror_dir)));
    }

    let http_config = config.http.to_http_config();
    let limit = config.fetch.max_bytes.as_u64();
    for gateway in &config.fetch.gateways {
        let fetcher = HttpFetcher::new(gateway.as_str(), &http_config)?.with_limit(limit);
        fetchers.push(Box::new(fetcher));
    }

    let mut multi = MultiFetcher::new(fetchers);
    multi.set_dist_path(dist_path);
    Ok(multi)
}

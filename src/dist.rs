//! Distribution root paths
//!
//! A distribution root is the path prefix (e.g. `/ipns/dist.ipfs.io`) that
//! fetchers resolve resource paths against.

use std::borrow::Cow;
use std::env;

/// Pinned distribution that migrations are currently fetched from
pub const CURRENT_IPFS_DIST: &str = "/ipfs/Qme8pJhBidEUXRdpcWLGR2fkG5kdwVnaMh3kabjfP8zz7Y";

/// Latest distribution, resolved through IPNS. Default for fetchers.
pub const IPNS_IPFS_DIST: &str = "/ipns/dist.ipfs.io";

/// Environment variable overriding the distribution root
pub const DIST_PATH_ENV_VAR: &str = "IPFS_DIST_PATH";

/// Return the distribution root to use.
///
/// `IPFS_DIST_PATH` wins when set to a non-empty value. Otherwise
/// `default` is used, and when that is empty too, [`IPNS_IPFS_DIST`].
/// The environment is read on every call.
///
/// To prefer the pinned distribution unless overridden:
/// `dist_path_env(CURRENT_IPFS_DIST)`.
pub fn dist_path_env(default: &str) -> String {
    let override_path = env::var(DIST_PATH_ENV_VAR).ok();
    resolve_dist_path(override_path.as_deref(), default).to_string()
}

/// Priority resolution behind [`dist_path_env`], without touching the environment
pub fn resolve_dist_path<'a>(override_path: Option<&'a str>, default: &'a str) -> &'a str {
    match override_path {
        Some(path) if !path.is_empty() => path,
        _ if !default.is_empty() => default,
        _ => IPNS_IPFS_DIST,
    }
}

/// Ensure the path starts with a single leading `/`
pub fn normalize_dist_path(dist_path: &str) -> Cow<'_, str> {
    if dist_path.starts_with('/') {
        Cow::Borrowed(dist_path)
    } else {
        Cow::Owned(format!("/{dist_path}"))
    }
}

/// Serializes tests that read or write `IPFS_DIST_PATH`
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

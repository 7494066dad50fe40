//! Local mirror backend

use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::context::FetchContext;
use super::error::{FetchError, Result};
use super::traits::{BoxReadCloser, Fetcher};
use crate::dist::IPNS_IPFS_DIST;

/// Serves `<root>/<dist_path>/<path>` from a directory on disk
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
    dist_path: String,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dist_path: IPNS_IPFS_DIST.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location on disk for a resource, refusing paths that escape the root
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for part in [self.dist_path.as_str(), path] {
            for component in Path::new(part.trim_start_matches('/')).components() {
                match component {
                    Component::Normal(segment) => resolved.push(segment),
                    Component::CurDir => {}
                    _ => {
                        return Err(FetchError::InvalidPath(format!(
                            "{}/{}",
                            self.dist_path.trim_end_matches('/'),
                            path.trim_start_matches('/')
                        )));
                    }
                }
            }
        }
        Ok(resolved)
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, ctx: &FetchContext, path: &str) -> Result<BoxReadCloser> {
        let file_path = self.resolve(path)?;
        debug!(path = %file_path.display(), "Opening mirrored file");

        let not_found = || FetchError::NotFound(file_path.display().to_string());
        let file = ctx
            .run(async {
                let file = tokio::fs::File::open(&file_path).await.map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => not_found(),
                    _ => FetchError::Io(e),
                })?;
                // Opening a directory succeeds on Linux; only regular files are content
                if !file.metadata().await?.is_file() {
                    return Err(not_found());
                }
                Ok::<_, FetchError>(file)
            })
            .await?;

        Ok(Box::new(file))
    }

    fn set_dist_path(&mut self, dist_path: &str) {
        self.dist_path = dist_path.to_string();
    }
}

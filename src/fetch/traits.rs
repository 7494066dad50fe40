use async_trait::async_trait;
use std::io;
use tokio::io::AsyncRead;

use super::context::FetchContext;
use super::error::Result;

/// An open byte stream with an explicit release step.
///
/// Dropping the stream releases it as well; `close` exists so callers can
/// observe release errors and so wrappers can forward the call.
pub trait ReadCloser: AsyncRead + Send + Unpin {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Stream handed back by a successful fetch; the caller owns it
pub type BoxReadCloser = Box<dyn ReadCloser>;

impl std::fmt::Debug for dyn ReadCloser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ReadCloser")
    }
}

impl<T: ReadCloser + ?Sized> ReadCloser for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl ReadCloser for tokio::fs::File {}

impl<T: AsRef<[u8]> + Send + Unpin> ReadCloser for io::Cursor<T> {}

/// Retrieval backend for distribution content
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the resource at `path`, relative to the configured distribution root.
    ///
    /// Must fail with [`FetchError::Cancelled`](super::FetchError::Cancelled)
    /// or [`FetchError::DeadlineExceeded`](super::FetchError::DeadlineExceeded)
    /// instead of blocking once `ctx` is done.
    async fn fetch(&self, ctx: &FetchContext, path: &str) -> Result<BoxReadCloser>;

    /// Point subsequent fetches at another distribution root
    fn set_dist_path(&mut self, dist_path: &str);
}

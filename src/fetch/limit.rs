use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tokio::io::{AsyncRead, ReadBuf};

use super::traits::ReadCloser;

/// Caps the number of bytes readable from a stream.
///
/// After `limit` bytes have been returned every read reports end-of-data,
/// and the inner stream is never asked for more than the remaining
/// allowance. `close` is forwarded to the inner stream unchanged.
#[derive(Debug)]
pub struct LimitReadCloser<R> {
    inner: R,
    remaining: u64,
}

impl<R: ReadCloser> LimitReadCloser<R> {
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }

    /// Bytes that may still be read
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl<R: ReadCloser> AsyncRead for LimitReadCloser<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.remaining == 0 {
            return Poll::Ready(Ok(()));
        }

        let max = usize::try_from(this.remaining)
            .unwrap_or(usize::MAX)
            .min(buf.remaining());
        let mut limited = ReadBuf::new(buf.initialize_unfilled_to(max));
        ready!(Pin::new(&mut this.inner).poll_read(cx, &mut limited))?;

        let n = limited.filled().len();
        buf.advance(n);
        this.remaining -= n as u64;
        Poll::Ready(Ok(()))
    }
}

impl<R: ReadCloser> ReadCloser for LimitReadCloser<R> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

//! Cancellation and deadline carried through a fetch

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::{FetchError, Result};

/// Per-call context handed to every [`Fetcher`](super::Fetcher).
///
/// Cloning shares the cancellation token, so cancelling any clone cancels
/// them all. Backends are expected to wrap their I/O in [`FetchContext::run`]
/// or poll [`FetchContext::check`] so a cancelled call fails fast.
#[derive(Debug, Clone)]
pub struct FetchContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl FetchContext {
    /// Context with no deadline that is only cancelled explicitly
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Use an externally owned token (e.g. one tripped by Ctrl+C)
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Derived context: cancelled with its parent, cancellable on its own
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail if the context is already cancelled or past its deadline
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(FetchError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolve once the context is done, yielding the reason
    pub async fn done(&self) -> FetchError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => FetchError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => FetchError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                FetchError::Cancelled
            }
        }
    }

    /// Drive `fut` until it completes or the context is done, whichever is first
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            res = fut => res,
        }
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new()
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("fetch cancelled")]
    Cancelled,

    #[error("fetch deadline exceeded")]
    DeadlineExceeded,

    #[error("no fetchers configured")]
    NoFetchers,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        if e.is_timeout() {
            FetchError::Timeout(url)
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Fetch result type
pub type Result<T> = std::result::Result<T, FetchError>;

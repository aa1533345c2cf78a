//! Typed errors for the archiver.
//!
//! Policy rejections (`TooSoon`, `NotLive`) and service failures
//! (`BadResponse`) are separate variants so callers can act on them without
//! string matching. Infrastructure failures stay boxed under `Transport`.

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Errors that can occur while checking or archiving a URL.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The save endpoint answered with something other than 200 + content-location
    #[error("bad response from archive.org (status {status_code}) for {url}")]
    BadResponse {
        status_code: u16,
        headers: HeaderMap,
        url: String,
    },

    /// A snapshot exists and is newer than the minimum interval
    #[error("too soon: last snapshot of {url} is {elapsed}s old, minimum is {min}s")]
    TooSoon { elapsed: u64, min: u64, url: String },

    /// Never archived and the archive does not consider the URL reachable
    #[error("given URL is not live: {url}")]
    NotLive { url: String },

    /// The index returned a malformed snapshot timestamp
    #[error("invalid snapshot timestamp: {0}")]
    Timestamp(#[from] TimestampError),

    /// Target URL cannot be turned into a request URL
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Invalid settings (e.g. a user agent that is not a valid header value)
    #[error("config error: {0}")]
    Config(String),

    /// Network or decoding failure talking to the archive
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ArchiveError {
    /// True for outcomes decided by the recency/liveness policy.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::TooSoon { .. } | Self::NotLive { .. })
    }

    /// The target URL, for variants that carry one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::BadResponse { url, .. }
            | Self::TooSoon { url, .. }
            | Self::NotLive { url }
            | Self::InvalidUrl { url, .. } => Some(url),
            Self::Timestamp(_) | Self::Config(_) | Self::Transport(_) => None,
        }
    }
}

/// Errors decoding a `YYYYMMDDHHMMSS` archive timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Not exactly 14 ASCII digits
    #[error("expected 14 digits, got {0:?}")]
    Malformed(String),

    /// Digits do not name a real UTC instant
    #[error("out of range: {0:?}")]
    OutOfRange(String),
}

/// Result type alias for archiver operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ArchiveError, Result};

/// What the archive index knows about a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub url: String,
    /// `YYYYMMDDHHMMSS` of the most recent capture; `None` if never archived
    pub last_timestamp: Option<String>,
    /// Whether the archive's crawler currently reaches the URL
    pub is_live: bool,
}

impl SnapshotInfo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            last_timestamp: None,
            is_live: false,
        }
    }

    pub fn with_last_timestamp(mut self, ts: impl Into<String>) -> Self {
        self.last_timestamp = Some(ts.into());
        self
    }

    pub fn with_live(mut self, is_live: bool) -> Self {
        self.is_live = is_live;
        self
    }
}

/// Raw body of the sparkline endpoint. Other fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparklineResponse {
    #[serde(default, deserialize_with = "non_empty")]
    pub last_ts: Option<String>,
    #[serde(default, deserialize_with = "false_if_null")]
    pub is_live: bool,
}

impl SparklineResponse {
    pub fn into_snapshot(self, url: impl Into<String>) -> SnapshotInfo {
        SnapshotInfo {
            url: url.into(),
            last_timestamp: self.last_ts,
            is_live: self.is_live,
        }
    }
}

fn non_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    let value: Option<String> = Option::deserialize(d)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn false_if_null<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    let value: Option<bool> = Option::deserialize(d)?;
    Ok(value.unwrap_or(false))
}

/// Outcome of the archive policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveDecision {
    Proceed,
    TooSoon { elapsed_seconds: u64, min_seconds: u64 },
    NotLive,
}

impl ArchiveDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }

    /// Turn a rejection into its error, tagged with the target URL.
    pub fn into_result(self, url: &str) -> Result<()> {
        match self {
            Self::Proceed => Ok(()),
            Self::TooSoon {
                elapsed_seconds,
                min_seconds,
            } => Err(ArchiveError::TooSoon {
                elapsed: elapsed_seconds,
                min: min_seconds,
                url: url.to_string(),
            }),
            Self::NotLive => Err(ArchiveError::NotLive {
                url: url.to_string(),
            }),
        }
    }
}

/// Metadata for a freshly created snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResult {
    pub url: String,
    /// Absolute URL of the new snapshot
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
}

/// Status line and headers of a HEAD response.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseHead {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
        }
    }

    /// Add a header. Panics on invalid names or values; meant for fixtures.
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.insert(
            name,
            value.parse().expect("Header value should parse correctly"),
        );
        self
    }

    /// Header value as text. Bytes that are not UTF-8 are read as Latin-1,
    /// so an echoed non-ASCII URL still comes through.
    pub fn header_text(&self, name: &str) -> Option<String> {
        let bytes = self.headers.get(name)?.as_bytes();
        Some(match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
        })
    }
}

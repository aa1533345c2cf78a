use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::error::{ArchiveError, Result};
use crate::policy::WEEK_SECONDS;

const DEFAULT_BASE_URL: &str = "https://web.archive.org/";

/// Identifies this tool to the archive's operators.
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

/// Settings for an [`Archiver`](crate::Archiver).
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Minimum age of the last snapshot before re-archiving
    pub min_interval_secs: u64,
    /// Origin of the archive service
    pub base_url: Url,
    /// Sent as `user-agent` on every request
    pub user_agent: String,
    /// Per-request timeout enforced by the HTTP transport
    pub request_timeout: Duration,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: WEEK_SECONDS,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL should parse"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ArchiveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_interval(mut self, secs: u64) -> Self {
        self.min_interval_secs = secs;
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Headers attached to every outgoing request.
    pub(crate) fn client_headers(&self) -> Result<HeaderMap> {
        let value = HeaderValue::from_str(&self.user_agent)
            .map_err(|_| ArchiveError::Config(format!("invalid user agent: {:?}", self.user_agent)))?;
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, value);
        Ok(headers)
    }
}

//! HTTP transport seam.
//!
//! The lookup and submission clients only build URLs and interpret
//! responses; the actual I/O goes through this trait so tests can swap in
//! [`MockTransport`](crate::testing::MockTransport).

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use url::Url;

use crate::error::Result;
use crate::types::ResponseHead;

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` and decode the body as JSON.
    ///
    /// Connection failures, non-2xx statuses and undecodable bodies are all
    /// reported as `ArchiveError::Transport`.
    async fn get_json(&self, url: Url, headers: HeaderMap) -> Result<serde_json::Value>;

    /// HEAD `url`, returning status and headers whatever the status code.
    async fn head(&self, url: Url, headers: HeaderMap) -> Result<ResponseHead>;

    /// Transport name for logging
    fn name(&self) -> &str;
}

//! Save Page Now submission.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ArchiveError, Result};
use crate::traits::HttpTransport;
use crate::types::{ArchiveResult, ResponseHead};

const CONTENT_LOCATION: &str = "content-location";
const ORIG_CONTENT_LENGTH: &str = "x-archive-orig-content-length";
const ORIG_SERVER: &str = "x-archive-orig-server";
const CACHE_KEY: &str = "x-cache-key";

#[derive(Clone)]
pub struct ArchiveSubmissionClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    headers: HeaderMap,
}

impl ArchiveSubmissionClient {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: Url, headers: HeaderMap) -> Self {
        Self {
            transport,
            base_url,
            headers,
        }
    }

    /// `<base>/save/<url>`, with the target appended verbatim.
    pub fn save_url(&self, url: &str) -> Result<Url> {
        self.base_url
            .join(&format!("/save/{}", url))
            .map_err(|source| ArchiveError::InvalidUrl {
                url: url.to_string(),
                source,
            })
    }

    /// Ask the archive to capture `url` now. Only the response headers are
    /// requested; they say where the capture was stored.
    pub async fn submit(&self, url: &str) -> Result<ArchiveResult> {
        let endpoint = self.save_url(url)?;
        debug!(%endpoint, transport = self.transport.name(), "Submitting capture");

        let head = self.transport.head(endpoint, self.headers.clone()).await?;
        parse_save_response(url, head, &self.base_url)
    }
}

/// Validate a save response: status must be exactly 200 and carry a
/// `content-location`. Anything else becomes `BadResponse` with the full
/// header set.
pub fn parse_save_response(url: &str, head: ResponseHead, base_url: &Url) -> Result<ArchiveResult> {
    let location = if head.status == StatusCode::OK {
        head.header_text(CONTENT_LOCATION)
            .and_then(|loc| base_url.join(&loc).ok())
    } else {
        None
    };

    let Some(location) = location else {
        warn!(
            url,
            status = head.status.as_u16(),
            "Archive returned an unusable save response"
        );
        return Err(ArchiveError::BadResponse {
            status_code: head.status.as_u16(),
            headers: head.headers,
            url: url.to_string(),
        });
    };

    let copy = |name: &str| head.header_text(name);
    Ok(ArchiveResult {
        url: url.to_string(),
        location: location.into(),
        content_length: copy(ORIG_CONTENT_LENGTH),
        server: copy(ORIG_SERVER),
        cache_key: copy(CACHE_KEY),
    })
}

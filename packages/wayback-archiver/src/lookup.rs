//! Snapshot lookup against the Wayback sparkline index.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use tracing::debug;
use url::Url;

use crate::error::{ArchiveError, Result};
use crate::traits::HttpTransport;
use crate::types::{SnapshotInfo, SparklineResponse};

const SPARKLINE_PATH: &str = "/__wb/sparkline?collection=web&output=json";

/// Read-only client for "when was this URL last captured, and is it live?"
#[derive(Clone)]
pub struct SnapshotLookupClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    headers: HeaderMap,
}

impl SnapshotLookupClient {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: Url, headers: HeaderMap) -> Self {
        Self {
            transport,
            base_url,
            headers,
        }
    }

    /// Index URL for `url`, e.g.
    /// `https://web.archive.org/__wb/sparkline?collection=web&output=json&url=…`.
    pub fn lookup_url(&self, url: &str) -> Result<Url> {
        let mut endpoint =
            self.base_url
                .join(SPARKLINE_PATH)
                .map_err(|source| ArchiveError::InvalidUrl {
                    url: url.to_string(),
                    source,
                })?;
        endpoint.query_pairs_mut().append_pair("url", url);
        Ok(endpoint)
    }

    pub async fn lookup(&self, url: &str) -> Result<SnapshotInfo> {
        let endpoint = self.lookup_url(url)?;
        debug!(%endpoint, transport = self.transport.name(), "Looking up snapshots");

        let body = self.transport.get_json(endpoint, self.headers.clone()).await?;
        let parsed: SparklineResponse =
            serde_json::from_value(body).map_err(|e| ArchiveError::Transport(Box::new(e)))?;

        let info = parsed.into_snapshot(url);
        debug!(
            url,
            last_ts = info.last_timestamp.as_deref().unwrap_or("none"),
            is_live = info.is_live,
            "Snapshot lookup complete"
        );
        Ok(info)
    }
}

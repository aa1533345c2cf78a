//! Testing utilities including a mock HTTP transport.
//!
//! Lets callers exercise the archiver end-to-end without touching the
//! network: canned index bodies and save responses go in, recorded requests
//! come out.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use std::sync::{Arc, RwLock};
use url::Url;

use crate::error::{ArchiveError, Result};
use crate::traits::HttpTransport;
use crate::types::ResponseHead;

/// A request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

#[derive(Debug, Clone)]
enum Canned<T> {
    Reply(T),
    Fail(String),
}

impl<T: Clone> Canned<T> {
    fn resolve(&self) -> Result<T> {
        match self {
            Self::Reply(value) => Ok(value.clone()),
            Self::Fail(message) => Err(transport_error(message)),
        }
    }
}

fn transport_error(message: &str) -> ArchiveError {
    ArchiveError::Transport(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        message.to_string(),
    )))
}

/// Mock transport for testing.
///
/// GETs answer with the configured snapshot body, HEADs with the configured
/// save response. Anything unconfigured fails as a transport error. Clones
/// share state, so keep one handle to inspect calls after handing another to
/// the archiver.
///
/// # Example
///
/// ```rust
/// use wayback_archiver::testing::MockTransport;
/// use wayback_archiver::ResponseHead;
/// use reqwest::StatusCode;
///
/// let mock = MockTransport::new()
///     .with_snapshot(serde_json::json!({ "is_live": true }))
///     .with_save_response(ResponseHead::new(StatusCode::BAD_GATEWAY));
/// assert_eq!(mock.head_call_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    snapshot: Arc<RwLock<Option<Canned<serde_json::Value>>>>,
    save_response: Arc<RwLock<Option<Canned<ResponseHead>>>>,
    calls: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body returned by the snapshot lookup.
    pub fn with_snapshot(self, body: serde_json::Value) -> Self {
        *self.snapshot.write().unwrap() = Some(Canned::Reply(body));
        self
    }

    /// Make the snapshot lookup fail as if the service were unreachable.
    pub fn with_lookup_failure(self, message: impl Into<String>) -> Self {
        *self.snapshot.write().unwrap() = Some(Canned::Fail(message.into()));
        self
    }

    /// Response returned by the save request.
    pub fn with_save_response(self, head: ResponseHead) -> Self {
        *self.save_response.write().unwrap() = Some(Canned::Reply(head));
        self
    }

    /// Make the save request fail as if the service were unreachable.
    pub fn with_save_failure(self, message: impl Into<String>) -> Self {
        *self.save_response.write().unwrap() = Some(Canned::Fail(message.into()));
        self
    }

    /// All requests, in order.
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.read().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.count(Method::GET)
    }

    pub fn head_call_count(&self) -> usize {
        self.count(Method::HEAD)
    }

    fn count(&self, method: Method) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    fn record(&self, method: Method, url: Url, headers: HeaderMap) {
        self.calls
            .write()
            .unwrap()
            .push(RecordedRequest { method, url, headers });
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get_json(&self, url: Url, headers: HeaderMap) -> Result<serde_json::Value> {
        self.record(Method::GET, url, headers);
        match self.snapshot.read().unwrap().as_ref() {
            Some(canned) => canned.resolve(),
            None => Err(transport_error("no canned snapshot response")),
        }
    }

    async fn head(&self, url: Url, headers: HeaderMap) -> Result<ResponseHead> {
        self.record(Method::HEAD, url, headers);
        match self.save_response.read().unwrap().as_ref() {
            Some(canned) => canned.resolve(),
            None => Err(transport_error("no canned save response")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn test_mock_tracks_calls_across_clones() {
        let mock = MockTransport::new()
            .with_snapshot(serde_json::json!({}))
            .with_save_response(ResponseHead::new(StatusCode::OK));
        let handle = mock.clone();
        let url = Url::parse("https://web.archive.org/").unwrap();

        mock.get_json(url.clone(), HeaderMap::new()).await.unwrap();
        mock.head(url.clone(), HeaderMap::new()).await.unwrap();
        mock.head(url, HeaderMap::new()).await.unwrap();

        assert_eq!(handle.get_call_count(), 1);
        assert_eq!(handle.head_call_count(), 2);
        assert_eq!(mock.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_unconfigured_mock_fails() {
        let mock = MockTransport::new();
        let url = Url::parse("https://web.archive.org/").unwrap();

        let result = mock.head(url, HeaderMap::new()).await;
        assert!(matches!(result, Err(ArchiveError::Transport(_))));
        assert_eq!(mock.head_call_count(), 1);
    }
}

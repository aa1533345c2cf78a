//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use url::Url;

use crate::error::{ArchiveError, Result};
use crate::traits::HttpTransport;
use crate::types::ResponseHead;

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ArchiveError::Transport(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (shared connection pool, custom TLS, proxies).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: Url, headers: HeaderMap) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ArchiveError::Transport(Box::new(e)))?
            .error_for_status()
            .map_err(|e| ArchiveError::Transport(Box::new(e)))?;

        response
            .json()
            .await
            .map_err(|e| ArchiveError::Transport(Box::new(e)))
    }

    async fn head(&self, url: Url, headers: HeaderMap) -> Result<ResponseHead> {
        let response = self
            .client
            .head(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ArchiveError::Transport(Box::new(e)))?;

        Ok(ResponseHead {
            status: response.status(),
            headers: response.headers().clone(),
        })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, USER_AGENT};
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one connection, answer with `response`, and hand back the raw
    /// request head.
    async fn serve_once(response: String) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        (Url::parse(&format!("http://{}/", addr)).unwrap(), handle)
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::with_client(
            Client::builder()
                .no_proxy()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
        )
    }

    fn user_agent() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("transport-test v1"));
        headers
    }

    #[tokio::test]
    async fn test_get_json_decodes_body_and_sends_headers() {
        let body = r#"{"last_ts":"20240101000000","is_live":true}"#;
        let (url, server) = serve_once(format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        ))
        .await;

        let value = transport()
            .get_json(url.join("/__wb/sparkline").unwrap(), user_agent())
            .await
            .unwrap();

        assert_eq!(value["last_ts"], "20240101000000");
        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /__wb/sparkline "));
        assert!(request.contains("user-agent: transport-test v1"));
    }

    #[tokio::test]
    async fn test_get_json_non_success_is_transport_error() {
        let (url, server) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                .to_string(),
        )
        .await;

        let result = transport().get_json(url, user_agent()).await;

        assert!(matches!(result, Err(ArchiveError::Transport(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_head_returns_status_and_headers_for_any_code() {
        let (url, server) = serve_once(
            "HTTP/1.1 502 Bad Gateway\r\nx-cache-key: abc\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                .to_string(),
        )
        .await;

        let head = transport()
            .head(url.join("/save/http://x.test/").unwrap(), user_agent())
            .await
            .unwrap();

        assert_eq!(head.status, StatusCode::BAD_GATEWAY);
        assert_eq!(head.headers.get("x-cache-key").unwrap(), "abc");
        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("head /save/http://x.test/ "));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        drop(listener);

        let result = transport().head(url, user_agent()).await;
        assert!(matches!(result, Err(ArchiveError::Transport(_))));
    }
}

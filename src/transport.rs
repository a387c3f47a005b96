//! Pluggable HTTP transport
//!
//! The resolver never talks to the network directly; it hands an
//! [`HttpRequest`] to an [`HttpTransport`] and reads status and headers from
//! the returned [`HeadResponse`]. [`ReqwestTransport`] is the default.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};

/// Failures raised while performing a request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request was cancelled")]
    Cancelled,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Failure reported by a custom transport.
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

impl TransportError {
    pub fn other(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Other(err.into())
    }
}

/// A request without a body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
}

impl HttpRequest {
    pub fn head(url: impl Into<String>) -> Self {
        Self {
            method: Method::HEAD,
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }
}

/// Status line and headers of a response. The body is never kept.
#[derive(Debug, Clone)]
pub struct HeadResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl HeadResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
        }
    }
}

/// Performs one HTTP request.
///
/// Implementations shared between tasks must be safe for concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HeadResponse, TransportError>;
}

/// [`HttpTransport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client with an overall request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HeadResponse, TransportError> {
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .send()
            .await?;

        // Only the status line and headers are kept; dropping the response
        // here releases its connection back to the pool.
        let head = HeadResponse {
            status: response.status(),
            headers: response.headers().clone(),
        };
        drop(response);
        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one connection with a canned raw HTTP/1.1 response and returns
    /// the request line that was received.
    async fn serve_once(raw_response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut received = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                if n == 0 || received.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            socket.write_all(raw_response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let text = String::from_utf8_lossy(&received).into_owned();
            text.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{addr}/"), handle)
    }

    fn local_transport() -> ReqwestTransport {
        ReqwestTransport::new(Client::builder().no_proxy().build().unwrap())
    }

    /// Status and headers come back from a real HTTP exchange.
    #[tokio::test]
    async fn reqwest_transport_returns_status_and_headers() {
        let (url, server) = serve_once(
            "HTTP/1.1 403 Forbidden\r\n\
             x-amz-bucket-region: eu-west-1\r\n\
             content-length: 0\r\n\
             connection: close\r\n\r\n",
        )
        .await;

        let transport = local_transport();
        let response = transport.send(HttpRequest::head(url)).await.unwrap();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers.get("X-Amz-Bucket-Region").unwrap(),
            "eu-west-1"
        );
        assert_eq!(server.await.unwrap(), "HEAD / HTTP/1.1");
    }

    /// Connection failures surface as `TransportError::Http`.
    #[tokio::test]
    async fn reqwest_transport_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = local_transport();
        let err = transport
            .send(HttpRequest::head(format!("http://{addr}/")))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(_)), "got {err:?}");
    }

    #[test]
    fn head_request_defaults() {
        let request = HttpRequest::head("https://my-bucket.s3.amazonaws.com");
        assert_eq!(request.method, Method::HEAD);
        assert!(request.headers.is_empty());
    }

    #[test]
    fn other_wraps_custom_errors() {
        let err = TransportError::other("dns lookup failed");
        assert_eq!(err.to_string(), "dns lookup failed");
    }
}

//! HTTP transport for Handle API requests
//!
//! [`HandleRequest`] describes one call as plain data. [`ReqwestTransport`]
//! executes it over mutual TLS; [`RecordingTransport`] answers from a canned
//! result and keeps every request it saw.

use async_trait::async_trait;
use reqwest::{Client, Identity, Method};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::HeadersMap;

pub const CREDENTIALS_ERROR_CODE: u16 = 50;
pub const IDENTITY_ERROR_CODE: u16 = 51;
pub const CLIENT_ERROR_CODE: u16 = 52;
pub const CONNECT_ERROR_CODE: u16 = 53;
pub const TIMEOUT_ERROR_CODE: u16 = 54;
pub const REQUEST_ERROR_CODE: u16 = 55;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Failed to read client credentials from '{path}': {reason}")]
    Credentials { path: String, reason: String },

    #[error("Client key/certificate rejected: {0}")]
    Identity(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Request(String),
}

impl TransportError {
    pub fn code(&self) -> u16 {
        match self {
            TransportError::Credentials { .. } => CREDENTIALS_ERROR_CODE,
            TransportError::Identity(_) => IDENTITY_ERROR_CODE,
            TransportError::Client(_) => CLIENT_ERROR_CODE,
            TransportError::Connect(_) => CONNECT_ERROR_CODE,
            TransportError::Timeout => TIMEOUT_ERROR_CODE,
            TransportError::Request(_) => REQUEST_ERROR_CODE,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_builder() {
            TransportError::Client(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Client credentials for mutual TLS, read from disk on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTls {
    pub key: PathBuf,
    pub cert: PathBuf,
    /// Verify the server certificate
    pub verify_server: bool,
}

#[derive(Debug, Clone)]
pub struct HandleRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeadersMap,
    pub body: Option<Vec<u8>>,
    pub tls: ClientTls,
    pub timeout: Option<Duration>,
}

/// Status line of the API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub reason: String,
}

impl TransportResponse {
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one request against the Handle API
#[async_trait]
pub trait HandleTransport: Send + Sync {
    async fn send(&self, request: HandleRequest) -> Result<TransportResponse>;
}

/// reqwest-backed transport presenting the configured client certificate
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    pub fn new() -> Self {
        Self
    }

    async fn build_client(&self, request: &HandleRequest) -> Result<Client> {
        let mut pem = read_pem(&request.tls.key).await?;
        pem.push(b'\n');
        pem.extend(read_pem(&request.tls.cert).await?);

        let identity =
            Identity::from_pem(&pem).map_err(|e| TransportError::Identity(e.to_string()))?;

        let mut builder = Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .danger_accept_invalid_certs(!request.tls.verify_server);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))
    }
}

async fn read_pem(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| TransportError::Credentials {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl HandleTransport for ReqwestTransport {
    async fn send(&self, request: HandleRequest) -> Result<TransportResponse> {
        let client = self.build_client(&request).await?;

        debug!(method = %request.method, url = %request.url, "Sending handle request");

        let mut builder = client.request(request.method, &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Handle API responded");

        Ok(TransportResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
        ))
    }
}

/// Transport double that records requests and returns a fixed outcome
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    outcome: Result<TransportResponse>,
    requests: Arc<Mutex<Vec<HandleRequest>>>,
}

impl RecordingTransport {
    pub fn responding(status: u16, reason: impl Into<String>) -> Self {
        Self::with_outcome(Ok(TransportResponse::new(status, reason)))
    }

    pub fn failing(error: TransportError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<TransportResponse>) -> Self {
        Self {
            outcome,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<HandleRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl HandleTransport for RecordingTransport {
    async fn send(&self, request: HandleRequest) -> Result<TransportResponse> {
        tracing::info!(method = %request.method, url = %request.url, "Recorded handle request");
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn request(key: PathBuf, cert: PathBuf) -> HandleRequest {
        HandleRequest {
            method: Method::PUT,
            url: "https://127.0.0.1:9/api/handles/1000/TEST/123".to_string(),
            headers: HeadersMap::new(),
            body: None,
            tls: ClientTls {
                key,
                cert,
                verify_server: false,
            },
            timeout: Some(Duration::from_secs(1)),
        }
    }

    #[test]
    fn test_error_codes_are_distinct_and_local() {
        let errors = [
            TransportError::Credentials {
                path: "k".to_string(),
                reason: "gone".to_string(),
            },
            TransportError::Identity(String::new()),
            TransportError::Client(String::new()),
            TransportError::Connect(String::new()),
            TransportError::Timeout,
            TransportError::Request(String::new()),
        ];

        let codes: Vec<u16> = errors.iter().map(TransportError::code).collect();
        assert!(codes.iter().all(|code| *code < 100));
        let distinct: HashSet<u16> = codes.iter().copied().collect();
        assert_eq!(distinct.len(), errors.len());
    }

    /// Accepts one connection, answers with `response` and returns the raw request
    async fn serve_once(response: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            let header_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before headers were complete");
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&raw[..header_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|value| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);

            while raw.len() < header_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before body was complete");
                raw.extend_from_slice(&buf[..n]);
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8(raw).unwrap()
        });

        (format!("http://{addr}"), handle)
    }

    fn fixture_request(method: Method, url: String) -> HandleRequest {
        HandleRequest {
            method,
            url,
            ..request(fixture("client.key"), fixture("client.crt"))
        }
    }

    #[tokio::test]
    async fn test_put_reaches_server_with_headers_and_body() {
        let (base, server) =
            serve_once("HTTP/1.1 201 Created\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await;
        let body = br#"{"values":[{"index":1,"type":"URL"}]}"#.to_vec();

        let mut request = fixture_request(
            Method::PUT,
            format!("{base}/api/handles/1000/TEST/123?overwrite=true"),
        );
        request
            .headers
            .insert("Authorization".to_string(), "Handle clientCert=\"true\"".to_string());
        request
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        request.body = Some(body.clone());

        let response = ReqwestTransport::new().send(request).await.unwrap();
        assert_eq!(response, TransportResponse::new(201, "Created"));

        let raw = server.await.unwrap();
        let (head, sent_body) = raw.split_once("\r\n\r\n").unwrap();
        let mut lines = head.lines();
        assert_eq!(
            lines.next(),
            Some("PUT /api/handles/1000/TEST/123?overwrite=true HTTP/1.1")
        );

        let headers: Vec<String> = lines.map(str::to_lowercase).collect();
        assert!(headers.contains(&"authorization: handle clientcert=\"true\"".to_string()));
        assert!(headers.contains(&"content-type: application/json".to_string()));
        assert!(headers.contains(&format!("content-length: {}", body.len())));
        assert_eq!(sent_body.as_bytes(), body.as_slice());
    }

    #[tokio::test]
    async fn test_delete_reaches_server_without_body() {
        let (base, server) =
            serve_once("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n").await;

        let response = ReqwestTransport::new()
            .send(fixture_request(
                Method::DELETE,
                format!("{base}/api/handles/1000/TEST/123"),
            ))
            .await
            .unwrap();
        assert_eq!(response, TransportResponse::new(204, "No Content"));

        let raw = server.await.unwrap();
        let (head, sent_body) = raw.split_once("\r\n\r\n").unwrap();
        assert_eq!(
            head.lines().next(),
            Some("DELETE /api/handles/1000/TEST/123 HTTP/1.1")
        );
        assert!(sent_body.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let (base, server) = serve_once(
            "HTTP/1.1 409 Conflict\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let response = ReqwestTransport::new()
            .send(fixture_request(Method::PUT, format!("{base}/api/handles/1000/TEST/123")))
            .await
            .unwrap();

        assert_eq!(response, TransportResponse::new(409, "Conflict"));
        assert!(!response.is_success());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = ReqwestTransport::new()
            .send(fixture_request(Method::PUT, format!("http://{addr}/api/handles/1000/TEST/123")))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Connect(_)), "{err:?}");
        assert_eq!(err.code(), CONNECT_ERROR_CODE);
    }

    #[test]
    fn test_response_success_range() {
        assert!(TransportResponse::new(201, "Created").is_success());
        assert!(!TransportResponse::new(409, "Conflict").is_success());
    }

    #[tokio::test]
    async fn test_unreadable_credentials() {
        let dir = TempDir::new().unwrap();
        let transport = ReqwestTransport::new();

        let err = transport
            .send(request(dir.path().join("missing.key"), dir.path().join("missing.crt")))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Credentials { .. }));
        assert!(err.to_string().contains("missing.key"));
    }

    #[tokio::test]
    async fn test_garbage_pem_is_rejected_before_connecting() {
        let dir = TempDir::new().unwrap();
        let key = dir.path().join("client.key");
        let cert = dir.path().join("client.crt");
        fs::write(&key, "not a key").unwrap();
        fs::write(&cert, "not a certificate").unwrap();

        let err = ReqwestTransport::new()
            .send(request(key, cert))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TransportError::Identity(_) | TransportError::Client(_)
        ));
    }

    #[tokio::test]
    async fn test_recording_transport_keeps_requests() {
        let transport = RecordingTransport::responding(201, "Created");

        let response = transport
            .send(request("a.key".into(), "a.crt".into()))
            .await
            .unwrap();

        assert_eq!(response, TransportResponse::new(201, "Created"));
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.requests()[0].method, Method::PUT);
    }
}

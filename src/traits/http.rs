//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction for the two HTTP operations the relay
//! performs: opening the long-lived upstream stream and posting a signal
//! downstream. Production code uses reqwest, tests use the mock adapter.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Streamed response body, one item per chunk delivered by the transport.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as a string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

/// Response whose body has not been read yet.
///
/// The status is available as soon as headers arrive; the body is consumed
/// chunk by chunk through [`StreamResponse::body`].
pub struct StreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Body chunks in arrival order
    pub body: ByteStream,
}

impl StreamResponse {
    /// Create a new streamed response.
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Drain the body into a string, stopping after `limit` bytes.
    ///
    /// Used to capture an error message from a rejected stream request
    /// without reading an unbounded body.
    pub async fn text_prefix(self, limit: usize) -> String {
        use futures_util::StreamExt;

        let mut body = self.body;
        let mut collected: Vec<u8> = Vec::new();
        while collected.len() < limit {
            match body.next().await {
                Some(Ok(chunk)) => collected.extend_from_slice(&chunk),
                _ => break,
            }
        }
        collected.truncate(limit);
        String::from_utf8_lossy(&collected).trim().to_string()
    }
}

impl std::fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// IO error while reading a body
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for HTTP client operations.
///
/// # Example
///
/// ```ignore
/// use signal_relay::traits::{HttpClient, Headers};
///
/// async fn status_of<C: HttpClient>(client: &C) -> u16 {
///     let response = client.get_stream("https://example.com/stream", &Headers::new()).await?;
///     response.status
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and hand back the body as a stream.
    ///
    /// Returns as soon as the response headers arrive. Non-2xx statuses are
    /// NOT turned into errors; the caller classifies the status itself.
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError>;

    /// Perform a POST request with a string body and buffer the response.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;
}

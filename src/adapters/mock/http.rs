//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that returns predefined
//! responses, streams or errors and records every request.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{Headers, HttpClient, HttpError, Response, StreamResponse};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail before any status arrives
    Error(HttpError),
    /// Stream the chunks, then close
    Stream { status: u16, chunks: Vec<Bytes> },
    /// Stream the chunks, then yield an error
    StreamThenError {
        status: u16,
        chunks: Vec<Bytes>,
        error: HttpError,
    },
    /// Stream the chunks, then never yield again
    StreamThenHang { status: u16, chunks: Vec<Bytes> },
    /// Never answer at all, not even with a status
    Hang,
}

impl MockResponse {
    /// Stream the chunks with the given status, then close.
    pub fn stream<B: Into<Bytes>>(status: u16, chunks: Vec<B>) -> Self {
        MockResponse::Stream {
            status,
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }
}

/// Mock HTTP client for testing.
///
/// Responses are looked up per URL: queued one-shot responses first (in
/// push order), then the fixed response for the URL or a matching prefix,
/// then the default.
///
/// # Example
///
/// ```ignore
/// use signal_relay::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.push_response(STREAM_URL, MockResponse::stream(200, vec!["\r\n"]));
/// client.set_response(STREAM_URL, MockResponse::stream(429, Vec::<Bytes>::new()));
///
/// // First GET streams a keep-alive and closes, every later GET gets 429.
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// One-shot responses by URL, consumed in order
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            queued: Arc::new(Mutex::new(HashMap::new())),
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a specific URL.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Queue a response that is used once, before any fixed response.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        let mut queued = self.queued.lock().unwrap();
        queued.entry(url.to_string()).or_default().push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests with the given method.
    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.get_requests()
            .into_iter()
            .filter(|request| request.method == method)
            .collect()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(queue) = self.queued.lock().unwrap().get_mut(url) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError> {
        self.record_request("GET", url, headers, None);

        match self.get_response(url) {
            Some(MockResponse::Stream { status, chunks }) => {
                let body = futures::stream::iter(chunks.into_iter().map(Ok));
                Ok(StreamResponse::new(status, Box::pin(body)))
            }
            Some(MockResponse::StreamThenError {
                status,
                chunks,
                error,
            }) => {
                let body = futures::stream::iter(chunks.into_iter().map(Ok))
                    .chain(futures::stream::once(async move { Err(error) }));
                Ok(StreamResponse::new(status, Box::pin(body)))
            }
            Some(MockResponse::StreamThenHang { status, chunks }) => {
                let body = futures::stream::iter(chunks.into_iter().map(Ok))
                    .chain(futures::stream::pending());
                Ok(StreamResponse::new(status, Box::pin(body)))
            }
            Some(MockResponse::Success(response)) => {
                let body = futures::stream::iter(vec![Ok(response.body)]);
                Ok(StreamResponse::new(response.status, Box::pin(body)))
            }
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Hang) => futures::future::pending().await,
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Hang) => futures::future::pending().await,
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

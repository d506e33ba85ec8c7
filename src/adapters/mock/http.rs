//! Mock HTTP transport for testing.
//!
//! Provides a scripted transport that returns predefined responses or byte
//! streams per URL and records every request for verification.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

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

/// Configuration for one scripted exchange.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Response(Response),
    /// Fail the exchange with a transport error
    Error(HttpError),
    /// Return a stream yielding these items in order
    Stream(Vec<Result<Bytes, HttpError>>),
}

/// Mock HTTP transport.
///
/// Responses are keyed by `(method, url)`, matched exactly first and by URL
/// prefix as a fallback. State is shared across clones so a test can keep a
/// handle while the client under test owns another.
///
/// # Example
///
/// ```ignore
/// use claw::adapters::mock::{MockHttpClient, MockResponse};
/// use claw::traits::{HttpClient, Headers, Response};
/// use bytes::Bytes;
///
/// let http = MockHttpClient::new();
/// http.script(
///     "GET",
///     "https://claude.ai/api/organizations",
///     MockResponse::Response(Response::new(200, Bytes::from(r#"[{"uuid":"org-1"}]"#))),
/// );
///
/// let response = http.get("https://claude.ai/api/organizations", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(http.requests().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Scripted exchanges as (method, url pattern, response)
    responses: Arc<Mutex<Vec<(String, String, MockResponse)>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create an empty mock; every unscripted request fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for a method and URL.
    ///
    /// Scripting the same method and URL again replaces the earlier entry.
    pub fn script(&self, method: &str, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.retain(|(m, u, _)| !(m == method && u == url));
        responses.push((method.to_string(), url.to_string(), response));
    }

    /// All recorded requests, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Count recorded requests whose URL contains the fragment.
    pub fn request_count(&self, method: &str, url_fragment: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.method == method && request.url.contains(url_fragment))
            .count()
    }

    fn record(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn lookup(&self, method: &str, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();
        if let Some((_, _, response)) = responses
            .iter()
            .find(|(m, u, _)| m == method && u == url)
        {
            return Some(response.clone());
        }
        responses
            .iter()
            .find(|(m, u, _)| m == method && url.starts_with(u.as_str()))
            .map(|(_, _, response)| response.clone())
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("GET", url, headers, None);
        match self.lookup("GET", url) {
            Some(MockResponse::Response(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(_)) => Err(HttpError::Other(format!(
                "stream scripted for non-streaming GET {url}"
            ))),
            None => Err(HttpError::Other(format!("no mock response for GET {url}"))),
        }
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("POST", url, headers, Some(body.to_string()));
        match self.lookup("POST", url) {
            Some(MockResponse::Response(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(_)) => Err(HttpError::Other(format!(
                "stream scripted for non-streaming POST {url}"
            ))),
            None => Err(HttpError::Other(format!("no mock response for POST {url}"))),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record("POST", url, headers, Some(body.to_string()));
        match self.lookup("POST", url) {
            Some(MockResponse::Stream(chunks)) => Ok(Box::pin(futures::stream::iter(chunks))),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Response(response)) if !response.is_success() => {
                Err(HttpError::ServerError {
                    status: response.status,
                    message: response.text_lossy(),
                })
            }
            Some(MockResponse::Response(_)) => Err(HttpError::Other(format!(
                "plain response scripted for streaming POST {url}"
            ))),
            None => Err(HttpError::Other(format!("no mock response for POST {url}"))),
        }
    }
}

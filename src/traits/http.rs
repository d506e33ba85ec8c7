//! HTTP transport trait abstraction.
//!
//! Provides a trait-based abstraction for the single-exchange and streaming
//! HTTP operations the chat client performs, enabling dependency injection
//! and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A pinned, boxed stream of response body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP response wrapper.
///
/// Statuses >= 400 are carried here as normal results rather than errors, so
/// callers can distinguish protocol-level rejections (401/403) from transport
/// failures.
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
    /// Create a new response without headers.
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

    /// Get the response body as a string, replacing invalid UTF-8.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level errors.
///
/// These cover connection-level failures only; an HTTP error status on a
/// non-streaming exchange is a normal [`Response`]. The one exception is
/// [`HttpError::ServerError`], which a streaming open reports when the
/// server rejects the request before any body bytes flow.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// Connection failed (refused, DNS, TLS)
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// Request timed out
    #[error("request timeout: {0}")]
    Timeout(String),
    /// Streaming request rejected with an error status
    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },
    /// Read failure mid-stream (premature close, reset)
    #[error("io error: {0}")]
    Io(String),
    /// Other transport error
    #[error("http error: {0}")]
    Other(String),
}

/// Trait for HTTP transport operations.
///
/// This trait abstracts the transport to enable dependency injection and
/// mocking in tests. Implementations include the production reqwest-based
/// client and a scripted mock. The caller supplies every header, including
/// the credential cookie; the transport neither caches nor inspects them.
///
/// # Example
///
/// ```ignore
/// use claw::traits::{Headers, HttpClient, HttpError};
///
/// async fn fetch<C: HttpClient>(client: &C) -> Result<String, HttpError> {
///     let response = client.get("https://claude.ai/api/organizations", &Headers::new()).await?;
///     Ok(response.text_lossy())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request, returning the response for any status code.
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request, returning the response for any status code.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request and return the body as a stream of chunks.
    ///
    /// Used for the SSE completion exchange where the response body arrives
    /// incrementally. Unlike [`HttpClient::post`], an error status here
    /// surfaces as [`HttpError::ServerError`] since there is no byte stream
    /// to hand back.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}

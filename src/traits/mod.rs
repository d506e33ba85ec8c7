//! Trait abstractions for dependency injection and testability.
//!
//! This module provides trait-based abstractions for the client's external
//! collaborators, enabling dependency injection, mocking, and better
//! testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport operations (GET, POST, streaming)
//! - [`SessionStore`] - Session key storage and retrieval
//! - [`DisplaySink`] - Structured presentation events for the host surface

pub mod display;
pub mod http;
pub mod session;

pub use display::{DisplayEvent, DisplaySink};
pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use session::{SessionStore, SessionStoreError};

//! Concrete implementations of trait abstractions.
//!
//! This module provides production adapters implementing the traits defined
//! in `crate::traits`, plus test doubles under [`mock`].
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`FileSessionStore`] - File-based session key storage
//! - [`TerminalDisplay`] - Plain-terminal display sink for the REPL binary
//!
//! # Mock Implementations
//!
//! - [`mock::MockHttpClient`] - Scripted HTTP responses and streams
//! - [`mock::MemorySessionStore`] - In-memory session key storage
//! - [`mock::RecordingDisplay`] - Display sink recording events for assertions

pub mod file_session;
pub mod mock;
pub mod reqwest_http;
pub mod terminal;

pub use file_session::FileSessionStore;
pub use mock::{MemorySessionStore, MockHttpClient, RecordingDisplay};
pub use reqwest_http::ReqwestHttpClient;
pub use terminal::TerminalDisplay;

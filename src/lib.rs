//! Claw - a terminal chat client for Claude.ai
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod sse;
pub mod traits;

//! SSE (Server-Sent Events) stream decoding
//!
//! Decodes the completion endpoint's streaming body into text deltas. The
//! wire format is line-oriented: each event rides a `data: <payload>` line,
//! and the stream ends with a `data: [DONE]` sentinel or plain close.
//!
//! # Module structure
//! - `events` - Decoded event type ([`StreamEvent`])
//! - `payloads` - Internal payload deserialization structs
//! - `decoder` - Incremental decoding logic ([`SseDecoder`])

mod decoder;
mod events;
mod payloads;

pub use decoder::SseDecoder;
pub use events::StreamEvent;

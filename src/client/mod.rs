//! Conversation orchestration.
//!
//! [`ChatClient`] ties the transport, the session store, the SSE decoder,
//! and the display sink together: it owns the bootstrap sequencing
//! (organization, then conversation), the message history, and the mapping
//! of decoded stream events to display events.

mod conversation;

pub use conversation::ChatClient;

//! Display sink trait abstraction.
//!
//! The chat client never renders anything itself; it emits structured
//! [`DisplayEvent`]s into a [`DisplaySink`] owned by the host surface. This
//! enum is the complete contract the host may rely on - no other event
//! types are emitted.

/// Structured presentation events emitted by the chat client.
///
/// Per prompt submission the sink sees `UserMessage`, `Thinking`, zero or
/// more `Status` updates while the organization and conversation are
/// bootstrapped, `StartAssistantMessage`, zero or more `Chunk`s in decode
/// order, and then exactly one of `Done` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Whether a session key is currently stored; drives the warning banner.
    CookieStatus { has_cookie: bool },
    /// The user's prompt was accepted and appended to the transcript.
    UserMessage { text: String },
    /// Transient waiting indicator shown until the response starts.
    Thinking,
    /// Bootstrap progress (organization resolution, conversation creation).
    Status { text: String },
    /// An assistant message is about to stream.
    StartAssistantMessage,
    /// An incremental fragment of assistant output.
    Chunk { text: String },
    /// The assistant message completed and was appended to the transcript.
    Done,
    /// The operation failed; no assistant message was recorded.
    Error { text: String },
    /// The conversation and transcript were reset.
    ClearChat,
}

/// Trait for the host display surface.
///
/// The client only calls into the sink, never reads from it. Rendering
/// (markdown, theming, layout) is entirely the host's concern.
pub trait DisplaySink: Send {
    /// Handle one presentation event.
    fn handle(&mut self, event: DisplayEvent);
}

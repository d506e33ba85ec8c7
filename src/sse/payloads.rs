//! Internal payload deserialization structs
//!
//! The completion endpoint has shipped two data-line shapes over time:
//!
//! - the current envelope nesting the text under a delta object:
//!   `{"type":"content_block_delta","delta":{"type":"text_delta","text":"Hi"}}`
//! - the legacy envelope carrying the text directly:
//!   `{"completion":"Hi"}`
//!
//! Both are recognized; unknown fields are ignored so new event types pass
//! through silently.

use serde::Deserialize;

/// Root of a data-line payload. Either `delta.text` or `completion` carries
/// the fragment; any other shape decodes to neither.
#[derive(Debug, Deserialize)]
pub(crate) struct EventEnvelope {
    #[serde(default)]
    pub delta: Option<DeltaBody>,
    #[serde(default)]
    pub completion: Option<String>,
}

/// Nested delta object of the current envelope shape.
#[derive(Debug, Deserialize)]
pub(crate) struct DeltaBody {
    #[serde(default)]
    pub text: Option<String>,
}

impl EventEnvelope {
    /// Extract the text fragment, preferring the current shape.
    pub(crate) fn into_text(self) -> Option<String> {
        if let Some(text) = self.delta.and_then(|delta| delta.text) {
            return Some(text);
        }
        self.completion
    }
}

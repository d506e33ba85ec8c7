//! Incremental SSE decoding logic.

use crate::sse::events::StreamEvent;
use crate::sse::payloads::EventEnvelope;

/// Marker prefixing every event-bearing line.
const DATA_PREFIX: &str = "data:";

/// Sentinel payload terminating the stream.
const STREAM_TERMINATOR: &str = "[DONE]";

/// Incremental decoder for the completion endpoint's SSE body.
///
/// Network chunk boundaries carry no meaning: a logical line may arrive
/// split across any number of chunks (including mid-character - assistant
/// text is UTF-8), and one chunk may carry many lines. The decoder
/// accumulates raw bytes and only interprets complete lines; the trailing
/// partial fragment waits for the next chunk. Feeding the same body in any
/// chunk partition yields the same events.
///
/// # Example
///
/// ```ignore
/// use claw::sse::{SseDecoder, StreamEvent};
///
/// let mut decoder = SseDecoder::new();
/// let events = decoder.feed(b"data: {\"completion\":\"Hi\"}\n");
/// assert_eq!(events, vec![StreamEvent::Delta { text: "Hi".to_string() }]);
/// ```
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes accumulated across chunks, holding at most one partial line.
    buffer: Vec<u8>,
    /// Set once the terminator was seen; further input is ignored.
    finished: bool,
}

impl SseDecoder {
    /// Create a new decoder for one stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of raw bytes, draining any events it completes.
    ///
    /// An empty chunk is a no-op. Events are returned in the order their
    /// lines appeared. After the `[DONE]` sentinel the decoder stops
    /// interpreting input even if more lines are present.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        if self.finished || chunk.is_empty() {
            return Vec::new();
        }

        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let rest = self.buffer.split_off(newline + 1);
            let line_bytes = std::mem::replace(&mut self.buffer, rest);
            let line = String::from_utf8_lossy(&line_bytes);

            if let Some(event) = decode_line(line.trim_end_matches(['\n', '\r'])) {
                let done = event == StreamEvent::Done;
                events.push(event);
                if done {
                    self.finished = true;
                    self.buffer.clear();
                    break;
                }
            }
        }
        events
    }

    /// Signal end-of-stream, draining the final unterminated line if any.
    ///
    /// A stream that closed without an explicit terminator still completes:
    /// a synthetic [`StreamEvent::Done`] is appended. After a real
    /// terminator this returns nothing.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;

        let mut events = Vec::new();
        let leftover = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&leftover);
        if let Some(event) = decode_line(line.trim_end_matches('\r')) {
            let done = event == StreamEvent::Done;
            events.push(event);
            if done {
                return events;
            }
        }
        events.push(StreamEvent::Done);
        events
    }
}

/// Decode one complete line into an event, or nothing.
///
/// Lines without the data prefix, payloads that are not JSON, and JSON of
/// any unrecognized shape are all silently ignored.
fn decode_line(line: &str) -> Option<StreamEvent> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();

    if payload == STREAM_TERMINATOR {
        return Some(StreamEvent::Done);
    }

    let envelope: EventEnvelope = serde_json::from_str(payload).ok()?;
    envelope
        .into_text()
        .map(|text| StreamEvent::Delta { text })
}

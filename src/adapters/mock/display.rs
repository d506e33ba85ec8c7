//! Display sink recording events for test assertions.

use std::sync::{Arc, Mutex};

use crate::traits::{DisplayEvent, DisplaySink};

/// Display sink that records every event it receives.
///
/// Events are shared across clones: hand one clone to the client and keep
/// another to assert on the exact emitted sequence.
///
/// # Example
///
/// ```ignore
/// use claw::adapters::mock::RecordingDisplay;
/// use claw::traits::{DisplayEvent, DisplaySink};
///
/// let display = RecordingDisplay::new();
/// let mut sink = display.clone();
/// sink.handle(DisplayEvent::Done);
/// assert_eq!(display.events(), vec![DisplayEvent::Done]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    events: Arc<Mutex<Vec<DisplayEvent>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in order.
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl DisplaySink for RecordingDisplay {
    fn handle(&mut self, event: DisplayEvent) {
        self.events.lock().unwrap().push(event);
    }
}

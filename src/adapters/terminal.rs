//! Plain-terminal display sink for the REPL binary.
//!
//! Prints assistant chunks to stdout as they stream and keeps everything
//! advisory (status, errors, the missing-key banner) on stderr so piped
//! output stays clean. No markdown rendering, theming, or layout here.

use std::io::Write;

use crate::traits::{DisplayEvent, DisplaySink};

/// Display sink writing to the process's stdout/stderr.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySink for TerminalDisplay {
    fn handle(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::CookieStatus { has_cookie } => {
                if !has_cookie {
                    eprintln!("no session key stored - use /login <sessionKey> to authenticate");
                }
            }
            // The prompt line the user just typed is already on screen.
            DisplayEvent::UserMessage { .. } => {}
            DisplayEvent::Thinking => eprintln!("thinking..."),
            DisplayEvent::Status { text } => eprintln!("{text}"),
            DisplayEvent::StartAssistantMessage => {}
            DisplayEvent::Chunk { text } => {
                print!("{text}");
                let _ = std::io::stdout().flush();
            }
            DisplayEvent::Done => println!(),
            DisplayEvent::Error { text } => eprintln!("error: {text}"),
            DisplayEvent::ClearChat => eprintln!("conversation cleared"),
        }
    }
}

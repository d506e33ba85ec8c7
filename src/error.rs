//! Chat client error taxonomy.
//!
//! Every public client operation catches these internally and surfaces them
//! to the host as a single `error` display event; nothing here is fatal. A
//! failed bootstrap or stream leaves the client reusable for the next send.

use thiserror::Error;

use crate::traits::HttpError;

/// Errors raised while dispatching a prompt.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No session key is stored.
    #[error("not authenticated: no session key stored")]
    NotAuthenticated,

    /// Connection-level transport failure.
    #[error("transport failure: {0}")]
    Transport(#[from] HttpError),

    /// HTTP error status or malformed success-path JSON on a non-streaming
    /// exchange. The status and body are surfaced verbatim.
    #[error("protocol error (HTTP {status}): {body}")]
    Protocol { status: u16, body: String },

    /// Failure during the streaming completion exchange.
    #[error("stream failure: {0}")]
    Stream(String),

    /// Organization list empty, or either bootstrap call failed.
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),
}

impl ChatError {
    /// Classify a failure opening the streaming exchange.
    ///
    /// A server rejection (error status before the stream starts) is a
    /// stream failure carrying the status verbatim; everything else is a
    /// plain transport failure.
    pub(crate) fn from_stream_open(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => {
                Self::Stream(format!("completion rejected (HTTP {status}): {message}"))
            }
            other => Self::Transport(other),
        }
    }
}

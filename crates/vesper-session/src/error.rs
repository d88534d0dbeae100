//! Error types for the session layer.

use vesper_core::error::VesperError;
use vesper_llm::LlmError;

/// Errors from the conversation session and history store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Transport(#[from] LlmError),
    #[error("no content generated")]
    NoContent,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SessionError> for VesperError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Transport(e) => VesperError::Transport(e.to_string()),
            SessionError::NoContent => VesperError::NoContent,
            SessionError::Storage(msg) => VesperError::Storage(msg),
            SessionError::Io(e) => VesperError::Io(e),
        }
    }
}

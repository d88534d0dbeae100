//! Vesper LLM crate - transport abstraction over generative-language APIs.
//!
//! Defines the `LlmTransport` trait consumed by the conversation session,
//! the reply types it produces, and a scripted mock implementation for
//! testing without a network.

pub mod gemini;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use vesper_core::types::Turn;

pub use gemini::{GeminiConfig, GeminiTransport};

// =============================================================================
// Errors
// =============================================================================

/// Errors from an LLM transport.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

// =============================================================================
// Reply types
// =============================================================================

/// One candidate completion within a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Ordered text parts of the candidate's content.
    pub parts: Vec<String>,
}

/// A reply from the transport: zero or more candidates, each with zero or
/// more content parts. The first part of the first candidate is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmReply {
    pub candidates: Vec<Candidate>,
}

impl LlmReply {
    /// Build a single-candidate, single-part reply. Handy for tests and mocks.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                parts: vec![text.into()],
            }],
        }
    }

    /// The first content part of the first candidate, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.parts.first())
            .map(String::as_str)
    }
}

// =============================================================================
// Trait
// =============================================================================

/// Transport that turns a conversation transcript into a model reply.
///
/// Implementations are stateless with respect to the conversation: the full
/// ordered history is supplied on every call.
#[async_trait]
pub trait LlmTransport: Send + Sync {
    async fn generate(&self, history: &[Turn]) -> Result<LlmReply, LlmError>;
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Scripted transport for tests: pops one canned reply per call and records
/// the text of the last turn it was shown.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<LlmReply, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<LlmReply, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Convenience constructor from plain reply texts.
    pub fn from_texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(LlmReply::from_text(*t))).collect())
    }

    /// The text of the final turn from each `generate` call, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmTransport for ScriptedTransport {
    async fn generate(&self, history: &[Turn]) -> Result<LlmReply, LlmError> {
        if let (Ok(mut prompts), Some(last)) = (self.prompts.lock(), history.last()) {
            prompts.push(last.text());
        }
        match self.replies.lock() {
            Ok(mut replies) => replies.pop_front().unwrap_or_else(|| {
                Err(LlmError::ProviderUnavailable(
                    "scripted replies exhausted".to_string(),
                ))
            }),
            Err(_) => Err(LlmError::ProviderUnavailable(
                "scripted transport poisoned".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_first_text() {
        let reply = LlmReply::from_text("hello");
        assert_eq!(reply.first_text(), Some("hello"));
    }

    #[test]
    fn test_reply_first_text_empty_candidates() {
        let reply = LlmReply::default();
        assert_eq!(reply.first_text(), None);
    }

    #[test]
    fn test_reply_first_text_candidate_without_parts() {
        let reply = LlmReply {
            candidates: vec![Candidate { parts: vec![] }],
        };
        assert_eq!(reply.first_text(), None);
    }

    #[test]
    fn test_reply_first_part_is_authoritative() {
        let reply = LlmReply {
            candidates: vec![
                Candidate {
                    parts: vec!["first".to_string(), "second".to_string()],
                },
                Candidate {
                    parts: vec!["other candidate".to_string()],
                },
            ],
        };
        assert_eq!(reply.first_text(), Some("first"));
    }

    #[tokio::test]
    async fn test_scripted_transport_pops_in_order() {
        let transport = ScriptedTransport::from_texts(&["one", "two"]);
        let history = vec![Turn::user("hi")];

        let r1 = transport.generate(&history).await.unwrap();
        assert_eq!(r1.first_text(), Some("one"));
        let r2 = transport.generate(&history).await.unwrap();
        assert_eq!(r2.first_text(), Some("two"));
    }

    #[tokio::test]
    async fn test_scripted_transport_exhausted() {
        let transport = ScriptedTransport::from_texts(&[]);
        let err = transport.generate(&[Turn::user("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_scripted_transport_records_prompts() {
        let transport = ScriptedTransport::from_texts(&["a", "b"]);
        transport.generate(&[Turn::user("first")]).await.unwrap();
        transport
            .generate(&[Turn::user("first"), Turn::user("second")])
            .await
            .unwrap();
        assert_eq!(transport.prompts(), vec!["first", "second"]);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LlmError::Network("timeout".to_string()).to_string(),
            "Network error: timeout"
        );
        assert_eq!(
            LlmError::RateLimitExceeded.to_string(),
            "Rate limit exceeded"
        );
        assert_eq!(
            LlmError::ParseError("no candidates".to_string()).to_string(),
            "Parse error: no candidates"
        );
    }
}

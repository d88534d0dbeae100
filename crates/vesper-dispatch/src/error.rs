//! Error types for parsing and dispatching model responses.

use vesper_session::SessionError;

/// Top-level parse failures. No actions are produced on either variant;
/// parsing is all-or-nothing at the list level.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Errors from the dispatch feedback loop.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("feedback branch limit of {limit} exceeded")]
    BranchLimitExceeded { limit: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_llm::LlmError;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::Malformed("unmatched brackets".to_string());
        assert_eq!(err.to_string(), "malformed response: unmatched brackets");

        let err = ParseError::Decode("expected value at line 1".to_string());
        assert_eq!(err.to_string(), "decode error: expected value at line 1");
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::BranchLimitExceeded { limit: 8 };
        assert_eq!(err.to_string(), "feedback branch limit of 8 exceeded");
    }

    #[test]
    fn test_dispatch_error_from_parse_error() {
        let err: DispatchError = ParseError::Malformed("x".to_string()).into();
        assert!(matches!(err, DispatchError::Parse(_)));
    }

    #[test]
    fn test_dispatch_error_from_session_error() {
        let err: DispatchError =
            SessionError::Transport(LlmError::RateLimitExceeded).into();
        assert!(matches!(err, DispatchError::Session(_)));
        assert!(err.to_string().contains("Rate limit exceeded"));
    }
}

//! Spoken-output seam for the dispatcher.

use async_trait::async_trait;

use vesper_core::error::VesperError;

/// Delivers a script line to the user.
///
/// Implementations range from a console print to full speech synthesis;
/// the dispatcher treats failures as non-fatal either way.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), VesperError>;
}

/// Speaker that writes lines to stdout. Used in quiet/text mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSpeaker;

impl ConsoleSpeaker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Speaker for ConsoleSpeaker {
    async fn speak(&self, text: &str) -> Result<(), VesperError> {
        println!("{}", text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_speaker_never_fails() {
        let speaker = ConsoleSpeaker::new();
        assert!(speaker.speak("hello").await.is_ok());
        assert!(speaker.speak("").await.is_ok());
    }
}

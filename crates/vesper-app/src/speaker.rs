//! Speech-synthesis speaker used in voice mode.

use async_trait::async_trait;

use vesper_audio::{pcm, playback, SpeechSynthesizer};
use vesper_core::error::VesperError;
use vesper_dispatch::Speaker;

/// Speaks script lines by synthesizing and playing them.
///
/// The text is also printed, so a failed or unavailable audio path still
/// leaves the user with the response.
pub struct TtsSpeaker<S> {
    synthesizer: S,
}

impl<S: SpeechSynthesizer> TtsSpeaker<S> {
    pub fn new(synthesizer: S) -> Self {
        Self { synthesizer }
    }
}

#[async_trait]
impl<S: SpeechSynthesizer> Speaker for TtsSpeaker<S> {
    async fn speak(&self, text: &str) -> Result<(), VesperError> {
        println!("{}", text);
        let samples = self.synthesizer.synthesize(text).await?;
        playback::play_samples(pcm::i16_to_f32(&samples), self.synthesizer.sample_rate()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_audio::MockSynthesizer;

    #[tokio::test]
    async fn test_empty_text_is_synthesis_error() {
        let speaker = TtsSpeaker::new(MockSynthesizer::default());
        let err = speaker.speak("").await.unwrap_err();
        assert!(matches!(err, VesperError::Synthesis(_)));
    }

    #[cfg(not(target_os = "windows"))]
    #[tokio::test]
    async fn test_playback_error_surfaces_off_windows() {
        let speaker = TtsSpeaker::new(MockSynthesizer::default());
        let err = speaker.speak("hello").await.unwrap_err();
        assert!(matches!(err, VesperError::Audio(_)));
    }
}

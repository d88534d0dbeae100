//! Vesper audio crate - microphone capture, speech recognition and speech
//! synthesis seams.
//!
//! Provides trait-based abstractions for turning captured audio into text and
//! text back into playable samples, plus mock implementations so the rest of
//! the stack can be exercised without audio hardware or a real model.

use std::future::Future;

use vesper_core::error::VesperError;

pub mod capture;
pub mod pcm;
pub mod playback;

pub use capture::{AudioBuffer, MicCaptureService};

// =============================================================================
// Traits
// =============================================================================

/// Service that turns captured audio into text.
///
/// Implementations wrap a speech-to-text backend. The returned transcript is
/// trimmed; an empty transcript means nothing intelligible was heard and is a
/// valid, non-error outcome.
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe audio samples into text.
    ///
    /// # Arguments
    /// * `samples` - Mono 16-bit PCM samples.
    /// * `sample_rate` - Sample rate of the audio in Hz.
    fn transcribe(
        &self,
        samples: &[i16],
        sample_rate: u32,
    ) -> impl Future<Output = Result<String, VesperError>> + Send;
}

/// Service that turns text into playable audio samples.
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech for the given text.
    ///
    /// Returns mono 16-bit PCM at the rate reported by [`Self::sample_rate`].
    fn synthesize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<i16>, VesperError>> + Send;

    /// Sample rate of the synthesized audio in Hz.
    fn sample_rate(&self) -> u32;
}

// =============================================================================
// Mock implementations
// =============================================================================

/// Mock recognizer that returns a fixed transcript.
///
/// Rejects empty input and a zero sample rate the way a real backend would.
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    transcript: String,
}

impl MockRecognizer {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
        }
    }
}

impl Default for MockRecognizer {
    fn default() -> Self {
        Self::new("[mock transcript]")
    }
}

impl SpeechRecognizer for MockRecognizer {
    async fn transcribe(
        &self,
        samples: &[i16],
        sample_rate: u32,
    ) -> Result<String, VesperError> {
        if samples.is_empty() {
            return Err(VesperError::Recognition(
                "cannot transcribe empty audio".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(VesperError::Recognition(
                "sample rate must be greater than 0".to_string(),
            ));
        }

        tracing::debug!(
            samples = samples.len(),
            sample_rate,
            "Mock transcription generated"
        );
        Ok(self.transcript.clone())
    }
}

/// Mock synthesizer producing a short burst of silence per character.
///
/// The output length is proportional to the input text so duration-sensitive
/// callers have something realistic to work with.
#[derive(Debug, Clone, Copy)]
pub struct MockSynthesizer {
    sample_rate: u32,
}

impl MockSynthesizer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new(16_000)
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<i16>, VesperError> {
        if text.is_empty() {
            return Err(VesperError::Synthesis(
                "cannot synthesize empty text".to_string(),
            ));
        }

        // Roughly 50ms of audio per character.
        let per_char = self.sample_rate as usize / 20;
        Ok(vec![0; per_char * text.chars().count()])
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

// =============================================================================
// Tests
// =============================================================================

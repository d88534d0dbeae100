//! Audio playback for synthesized speech.
//!
//! Plays mono f32 samples through the default output device via cpal and
//! returns once the clip has finished. On non-Windows platforms playback
//! returns `VesperError::Audio`; callers fall back to console output.

use vesper_core::error::VesperError;

/// Play mono samples through the default output device.
#[cfg(target_os = "windows")]
pub async fn play_samples(samples: Vec<f32>, sample_rate: u32) -> Result<(), VesperError> {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use tracing::debug;

    if samples.is_empty() {
        return Ok(());
    }
    if sample_rate == 0 {
        return Err(VesperError::Audio("sample rate must be greater than 0".into()));
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| VesperError::Audio("no default output device".into()))?;

    let config = cpal::StreamConfig {
        channels: 1,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let duration_secs = samples.len() as f64 / sample_rate as f64;
    let source = Arc::new(samples);
    let cursor = Arc::new(AtomicUsize::new(0));

    let cb_source = Arc::clone(&source);
    let cb_cursor = Arc::clone(&cursor);
    let stream = device
        .build_output_stream(
            &config,
            move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let start = cb_cursor.fetch_add(out.len(), Ordering::Relaxed);
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = cb_source.get(start + i).copied().unwrap_or(0.0);
                }
            },
            |err| tracing::error!(error = %err, "Playback stream error"),
            None,
        )
        .map_err(|e| VesperError::Audio(format!("failed to build playback stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| VesperError::Audio(format!("failed to start playback: {}", e)))?;

    debug!(duration_secs, "Playing synthesized audio");
    // Small tail so the device drains before the stream drops.
    tokio::time::sleep(std::time::Duration::from_secs_f64(duration_secs + 0.1)).await;
    Ok(())
}

#[cfg(not(target_os = "windows"))]
pub async fn play_samples(_samples: Vec<f32>, _sample_rate: u32) -> Result<(), VesperError> {
    Err(VesperError::Audio(
        "audio playback is only available on Windows".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "windows"))]
    #[tokio::test]
    async fn test_playback_errors_off_windows() {
        let err = play_samples(vec![0.0; 100], 16_000).await.unwrap_err();
        assert!(err.to_string().contains("only available on Windows"));
    }
}

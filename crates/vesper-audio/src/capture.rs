//! Microphone capture via cpal (WASAPI backend).
//!
//! Capture runs at the device's preferred configuration and is downmixed to
//! mono in the callback; the actual rate is reported alongside the drained
//! samples so the recognizer sees the truth rather than a requested value.
//!
//! On non-Windows platforms `start` returns `VesperError::Audio`.

#[cfg(not(target_os = "windows"))]
use tracing::warn;

use std::sync::atomic::AtomicBool;
#[cfg(target_os = "windows")]
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use vesper_core::config::AudioConfig;
use vesper_core::error::VesperError;

/// Shared sample sink filled from the capture callback thread.
///
/// Bounded; once full, the oldest samples are discarded so a forgotten
/// capture session cannot grow without limit.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    inner: Arc<Mutex<Vec<f32>>>,
    capacity: usize,
}

impl AudioBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
            capacity,
        }
    }

    /// Append samples, discarding from the front when over capacity.
    pub fn push(&self, samples: &[f32]) {
        let Ok(mut buf) = self.inner.lock() else {
            return;
        };
        buf.extend_from_slice(samples);
        let len = buf.len();
        if len > self.capacity {
            buf.drain(..len - self.capacity);
        }
    }

    /// Drain everything buffered so far.
    pub fn drain(&self) -> Vec<f32> {
        match self.inner.lock() {
            Ok(mut buf) => std::mem::take(&mut *buf),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wrapper to make `cpal::Stream` storable behind a `Mutex` on Windows.
///
/// `cpal::Stream` carries a `*mut ()` marker that blocks auto `Send`/`Sync`.
/// We only ever store the handle to keep capture alive and drop it to stop.
#[cfg(target_os = "windows")]
struct SendStream(#[allow(dead_code)] cpal::Stream);

// SAFETY: the stream handle is never used to reach the callback's data from
// another thread; cpal's WASAPI backend runs its callback on a thread it
// owns, and our only operations on the handle are play() at start and drop.
#[cfg(target_os = "windows")]
unsafe impl Send for SendStream {}
#[cfg(target_os = "windows")]
unsafe impl Sync for SendStream {}

/// Microphone capture into a shared [`AudioBuffer`].
pub struct MicCaptureService {
    config: AudioConfig,
    #[allow(dead_code)] // Set in the Windows impl; the stub ignores it.
    active: Arc<AtomicBool>,
    buffer: AudioBuffer,
    /// The sample rate the device actually delivered, set on start.
    captured_rate: Arc<Mutex<u32>>,
    #[cfg(target_os = "windows")]
    stream: Mutex<Option<SendStream>>,
}

impl MicCaptureService {
    pub fn new(config: AudioConfig) -> Self {
        // Hold at most 60 seconds of audio at the configured rate.
        let capacity = config.sample_rate as usize * 60;
        let captured_rate = config.sample_rate;
        Self {
            config,
            active: Arc::new(AtomicBool::new(false)),
            buffer: AudioBuffer::new(capacity),
            captured_rate: Arc::new(Mutex::new(captured_rate)),
            #[cfg(target_os = "windows")]
            stream: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Sample rate of the samples in the buffer.
    pub fn captured_rate(&self) -> u32 {
        self.captured_rate
            .lock()
            .map(|r| *r)
            .unwrap_or(self.config.sample_rate)
    }

    /// Take everything captured since the last drain.
    pub fn drain(&self) -> Vec<f32> {
        self.buffer.drain()
    }
}

// =============================================================================
// Windows implementation
// =============================================================================

#[cfg(target_os = "windows")]
impl MicCaptureService {
    pub async fn start(&self) -> Result<(), VesperError> {
        use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
        use tracing::{debug, info};

        if self.active.load(Ordering::Relaxed) {
            return Err(VesperError::Audio("capture already active".into()));
        }

        let host = cpal::default_host();
        let device = if self.config.device_name == "default" {
            host.default_input_device()
                .ok_or_else(|| VesperError::Audio("no default input device".into()))?
        } else {
            let wanted = self.config.device_name.to_lowercase();
            host.input_devices()
                .map_err(|e| VesperError::Audio(format!("failed to enumerate devices: {}", e)))?
                .find(|d| {
                    d.name()
                        .map(|n| n.to_lowercase().contains(&wanted))
                        .unwrap_or(false)
                })
                .ok_or_else(|| {
                    VesperError::Audio(format!(
                        "audio device '{}' not found",
                        self.config.device_name
                    ))
                })?
        };

        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
        debug!(device = %device_name, "Selected input device");

        // Devices rarely honor arbitrary formats; take the default and
        // record what we actually got.
        let supported = device
            .default_input_config()
            .map_err(|e| VesperError::Audio(format!("failed to query device config: {}", e)))?;
        let stream_config = cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };

        let channels = stream_config.channels as usize;
        if let Ok(mut rate) = self.captured_rate.lock() {
            *rate = stream_config.sample_rate.0;
        }

        let buffer = self.buffer.clone();
        let active_flag = Arc::clone(&self.active);

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if channels == 1 {
                        buffer.push(data);
                        return;
                    }
                    // Downmix interleaved frames to mono.
                    let mono: Vec<f32> = data
                        .chunks_exact(channels)
                        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                        .collect();
                    buffer.push(&mono);
                },
                move |err| {
                    tracing::error!(error = %err, "Capture stream error");
                    active_flag.store(false, Ordering::Relaxed);
                },
                None,
            )
            .map_err(|e| VesperError::Audio(format!("failed to build capture stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| VesperError::Audio(format!("failed to start capture stream: {}", e)))?;

        if let Ok(mut guard) = self.stream.lock() {
            *guard = Some(SendStream(stream));
        }
        self.active.store(true, Ordering::Relaxed);
        info!(
            device = %device_name,
            rate = stream_config.sample_rate.0,
            channels,
            "Microphone capture started"
        );
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), VesperError> {
        if !self.active.load(Ordering::Relaxed) {
            return Err(VesperError::Audio("capture is not active".into()));
        }
        if let Ok(mut guard) = self.stream.lock() {
            *guard = None;
        }
        self.active.store(false, Ordering::Relaxed);
        tracing::info!("Microphone capture stopped");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Non-Windows stub
// =============================================================================

#[cfg(not(target_os = "windows"))]
impl MicCaptureService {
    pub async fn start(&self) -> Result<(), VesperError> {
        warn!("Microphone capture requested on an unsupported platform");
        Err(VesperError::Audio(
            "microphone capture is only available on Windows".into(),
        ))
    }

    pub async fn stop(&self) -> Result<(), VesperError> {
        Err(VesperError::Audio(
            "microphone capture is only available on Windows".into(),
        ))
    }

    pub fn is_active(&self) -> bool {
        false
    }
}

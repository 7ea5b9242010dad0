//! System audio capture driving a show property.
//!
//! The input callback computes RMS loudness per buffer, runs it through an
//! exponential smoothing envelope, and writes the result into a property's
//! normalized scale. All the work happens on the audio thread; the
//! simulation sees it as one more producer behind the frame commit.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::error::AudioError;
use crate::registry::ScaleWriter;

/// Root-mean-square amplitude of a sample buffer. Empty buffers are silent.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Exponentially smoothed loudness level in [0, 1].
///
/// `smoothing` in (0, 1] is the fraction of the gap closed per buffer
/// (1.0 = no smoothing). `gain` scales raw RMS into a usable range: line
/// levels rarely exceed 0.25 RMS, so a gain around 4 maps a loud passage
/// near full scale.
#[derive(Debug)]
pub struct LevelEnvelope {
    level: f32,
    smoothing: f32,
    gain: f32,
}

impl LevelEnvelope {
    pub fn new(smoothing: f32, gain: f32) -> Self {
        Self {
            level: 0.0,
            smoothing: smoothing.clamp(1e-3, 1.0),
            gain: gain.max(0.0),
        }
    }

    /// Fold one buffer into the envelope; returns the new output level.
    pub fn feed(&mut self, samples: &[f32]) -> f32 {
        let target = rms(samples);
        self.level += (target - self.level) * self.smoothing;
        (self.level * self.gain).clamp(0.0, 1.0)
    }

    pub fn level(&self) -> f32 {
        (self.level * self.gain).clamp(0.0, 1.0)
    }
}

/// An open capture stream. Dropping it stops the capture.
pub struct AudioInput {
    _stream: cpal::Stream,
    device_name: String,
}

impl AudioInput {
    /// Open the default input device and pipe its smoothed loudness into
    /// `writer` as a normalized scale.
    pub fn capture(
        writer: Box<dyn ScaleWriter>,
        smoothing: f32,
        gain: f32,
    ) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(AudioError::NoDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "<unknown>".to_string());
        let config = device.default_input_config()?;
        log::info!(
            "audio capture on '{}' ({} Hz, {:?})",
            device_name,
            config.sample_rate().0,
            config.sample_format()
        );

        let envelope = LevelEnvelope::new(smoothing, gain);
        let err_fn = |err| log::warn!("audio stream error: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream_f32(&device, &config.into(), envelope, writer, err_fn)?
            }
            cpal::SampleFormat::I16 => {
                build_stream_i16(&device, &config.into(), envelope, writer, err_fn)?
            }
            cpal::SampleFormat::U16 => {
                build_stream_u16(&device, &config.into(), envelope, writer, err_fn)?
            }
            other => {
                log::warn!("unsupported audio sample format {:?}", other);
                return Err(AudioError::NoDevice);
            }
        };
        stream.play()?;

        Ok(Self {
            _stream: stream,
            device_name,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

fn build_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut envelope: LevelEnvelope,
    writer: Box<dyn ScaleWriter>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_input_stream(
        config,
        move |data: &[f32], _| {
            writer.set_scale(envelope.feed(data));
        },
        err_fn,
        None,
    )
}

fn build_stream_i16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut envelope: LevelEnvelope,
    writer: Box<dyn ScaleWriter>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let mut scratch = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[i16], _| {
            scratch.clear();
            scratch.extend(data.iter().map(|&s| s as f32 / i16::MAX as f32));
            writer.set_scale(envelope.feed(&scratch));
        },
        err_fn,
        None,
    )
}

fn build_stream_u16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut envelope: LevelEnvelope,
    writer: Box<dyn ScaleWriter>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let mut scratch = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[u16], _| {
            scratch.clear();
            scratch.extend(
                data.iter()
                    .map(|&s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0),
            );
            writer.set_scale(envelope.feed(&scratch));
        },
        err_fn,
        None,
    )
}

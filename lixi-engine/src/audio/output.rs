//! Audio output using cpal
//!
//! Opens an output device and services it with the cue mixer. Prefers
//! 44.1 kHz stereo f32 to match the synthesis rate, falling back to the
//! device default config; a requested device that cannot be found falls
//! back to the system default.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use crate::audio::mixer::CueMixer;
use crate::error::{Error, Result};

/// Audio output manager: owns the cpal stream feeding from a shared mixer
pub struct CueOutput {
    config: StreamConfig,
    _stream: Stream,
}

impl CueOutput {
    /// List available audio output device names
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();

        let devices: Vec<String> = host
            .output_devices()
            .map_err(|e| Error::AudioOutput(format!("Failed to enumerate devices: {}", e)))?
            .filter_map(|device| device.name().ok())
            .collect();

        debug!("Found {} output devices", devices.len());
        Ok(devices)
    }

    /// Open a device and start the stream
    ///
    /// # Arguments
    /// - `device_name`: Optional device name (None = default device)
    /// - `mixer`: Shared mixer the audio callback drains
    ///
    /// # Errors
    /// Device not found and no default available, or the stream fails to
    /// build/start. Callers degrade to silent operation on error.
    pub fn open(device_name: Option<&str>, mixer: Arc<Mutex<CueMixer>>) -> Result<Self> {
        let host = cpal::default_host();

        let device = if let Some(name) = device_name {
            let mut devices = host
                .output_devices()
                .map_err(|e| Error::AudioOutput(format!("Failed to enumerate devices: {}", e)))?;

            match devices.find(|d| d.name().ok().as_deref() == Some(name)) {
                Some(dev) => {
                    info!("Found requested audio device: {}", name);
                    dev
                }
                None => {
                    warn!(
                        "Requested device '{}' not found, falling back to default device",
                        name
                    );
                    host.default_output_device().ok_or_else(|| {
                        Error::AudioOutput(format!(
                            "Device '{}' not found and no default device available",
                            name
                        ))
                    })?
                }
            }
        } else {
            host.default_output_device()
                .ok_or_else(|| Error::AudioOutput("No default output device found".to_string()))?
        };

        let (config, sample_format) = Self::get_best_config(&device)?;
        debug!(
            "Audio config: sample_rate={}, channels={}, format={:?}",
            config.sample_rate.0, config.channels, sample_format
        );

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream_f32(&device, &config, mixer)?,
            SampleFormat::I16 => Self::build_stream_i16(&device, &config, mixer)?,
            sample_format => {
                return Err(Error::AudioOutput(format!(
                    "Unsupported sample format: {:?}",
                    sample_format
                )));
            }
        };

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("Failed to start stream: {}", e)))?;

        info!("Audio stream started");
        Ok(Self {
            config,
            _stream: stream,
        })
    }

    /// Stream sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Pick the best supported configuration for cue playback
    ///
    /// Prefers 44.1 kHz, stereo, f32 (matching the synthesis format).
    fn get_best_config(device: &Device) -> Result<(StreamConfig, SampleFormat)> {
        let mut supported_configs = device
            .supported_output_configs()
            .map_err(|e| Error::AudioOutput(format!("Failed to get device configs: {}", e)))?;

        let preferred = supported_configs.find(|config| {
            config.channels() == 2
                && config.min_sample_rate().0 <= 44100
                && config.max_sample_rate().0 >= 44100
                && config.sample_format() == SampleFormat::F32
        });

        if let Some(supported_config) = preferred {
            let sample_format = supported_config.sample_format();
            let config = supported_config
                .with_sample_rate(cpal::SampleRate(44100))
                .config();
            return Ok((config, sample_format));
        }

        // Fallback: device default
        let supported_config = device
            .default_output_config()
            .map_err(|e| Error::AudioOutput(format!("Failed to get default config: {}", e)))?;

        let sample_format = supported_config.sample_format();
        let config = supported_config.config();
        Ok((config, sample_format))
    }

    fn build_stream_f32(
        device: &Device,
        config: &StreamConfig,
        mixer: Arc<Mutex<CueMixer>>,
    ) -> Result<Stream> {
        let channels = config.channels as usize;

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut mixer = mixer.lock().unwrap();
                    mixer.mix_into(data, channels);
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                },
                None, // No timeout
            )
            .map_err(|e| Error::AudioOutput(format!("Failed to build stream: {}", e)))?;

        Ok(stream)
    }

    fn build_stream_i16(
        device: &Device,
        config: &StreamConfig,
        mixer: Arc<Mutex<CueMixer>>,
    ) -> Result<Stream> {
        let channels = config.channels as usize;
        let mut scratch: Vec<f32> = Vec::new();

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    scratch.clear();
                    scratch.resize(data.len(), 0.0);
                    {
                        let mut mixer = mixer.lock().unwrap();
                        mixer.mix_into(&mut scratch, channels);
                    }
                    for (dst, &src) in data.iter_mut().zip(scratch.iter()) {
                        *dst = (src.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                    }
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("Failed to build stream: {}", e)))?;

        Ok(stream)
    }
}

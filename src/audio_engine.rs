use std::f32::consts::TAU;
use std::sync::{Arc, RwLock};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::types::ToneParams;

/// Session-long sine tone generator on the default output device. The stream
/// is created once and never torn down; audibility is gated by
/// `ToneParams::running`, which silences the callback without dropping the
/// oscillator phase.
pub struct AudioEngine {
    params: Arc<RwLock<ToneParams>>,
    _stream: cpal::Stream,
    pub device_name: String,
    pub sample_rate: u32,
}

impl AudioEngine {
    pub fn new() -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| "No default audio output device found".to_owned())?;
        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown output device".to_owned());

        let supported_config = device
            .default_output_config()
            .map_err(|err| format!("Failed to read default output config: {err}"))?;
        let config = supported_config.config();
        let sample_rate = config.sample_rate.0;

        let params = Arc::new(RwLock::new(ToneParams::default()));

        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, params.clone())?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, params.clone())?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, params.clone())?,
            other => {
                return Err(format!(
                    "Unsupported output sample format from audio device: {other:?}"
                ));
            }
        };

        stream
            .play()
            .map_err(|err| format!("Failed to start audio stream: {err}"))?;

        Ok(Self {
            params,
            _stream: stream,
            device_name,
            sample_rate,
        })
    }

    pub fn set_params(&self, params: ToneParams) {
        write_copy(&self.params, params);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    params: Arc<RwLock<ToneParams>>,
) -> Result<cpal::Stream, String>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut oscillator = SineOscillator::new(config.sample_rate.0 as f32);

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _| {
                let params = read_copy(&params);
                write_audio_buffer(data, channels, &mut oscillator, params);
            },
            move |err| {
                eprintln!("Audio stream error: {err}");
            },
            None,
        )
        .map_err(|err| format!("Failed to build output stream: {err}"))?;

    Ok(stream)
}

fn write_audio_buffer<T>(
    output: &mut [T],
    channels: usize,
    oscillator: &mut SineOscillator,
    params: ToneParams,
) where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value = if params.running {
            oscillator.next_sample(params.frequency_hz) * params.gain.clamp(0.0, 1.0)
        } else {
            0.0
        };

        for sample in frame.iter_mut() {
            *sample = T::from_sample(value);
        }
    }
}

struct SineOscillator {
    sample_rate: f32,
    phase: f32,
}

impl SineOscillator {
    fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
        }
    }

    fn next_sample(&mut self, frequency_hz: f32) -> f32 {
        let value = self.phase.sin();
        self.phase = wrap_phase(self.phase + TAU * frequency_hz / self.sample_rate);
        value
    }
}

fn read_copy<T: Copy>(lock: &RwLock<T>) -> T {
    match lock.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn write_copy<T: Copy>(lock: &RwLock<T>, value: T) {
    match lock.write() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}

fn wrap_phase(mut phase: f32) -> f32 {
    while phase >= TAU {
        phase -= TAU;
    }
    phase
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillator_wraps_phase_and_stays_bounded() {
        let mut oscillator = SineOscillator::new(48_000.0);

        for _ in 0..200_000 {
            let value = oscillator.next_sample(440.0);
            assert!((-1.0..=1.0).contains(&value));
        }
        assert!(oscillator.phase >= 0.0 && oscillator.phase < TAU);
    }

    #[test]
    fn suspended_buffer_is_silent() {
        let mut oscillator = SineOscillator::new(48_000.0);
        let mut buffer = [1.0_f32; 64];
        let params = ToneParams {
            running: false,
            ..ToneParams::default()
        };

        write_audio_buffer(&mut buffer, 2, &mut oscillator, params);

        assert!(buffer.iter().all(|&sample| sample == 0.0));
        assert_eq!(oscillator.phase, 0.0);
    }

    #[test]
    fn running_buffer_scales_with_gain() {
        let mut oscillator = SineOscillator::new(48_000.0);
        oscillator.phase = TAU / 4.0;
        let mut buffer = [0.0_f32; 2];
        let params = ToneParams {
            frequency_hz: 440.0,
            gain: 0.25,
            running: true,
        };

        write_audio_buffer(&mut buffer, 2, &mut oscillator, params);

        // sin(TAU/4) = 1.0, both channels carry the same sample
        assert!((buffer[0] - 0.25).abs() < 1.0e-6);
        assert_eq!(buffer[0], buffer[1]);
    }
}

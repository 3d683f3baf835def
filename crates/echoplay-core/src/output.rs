//! CPAL audio output wrapper.
//!
//! Owns the device stream and the boundary where the player's planar
//! blocks get interleaved into the device buffer.

use crate::block::AudioBlock;
use crate::callback::PlayerCallbackState;
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Wrapper to hold `cpal::Stream` in a `Send` context.
///
/// # Safety
/// `cpal::Stream` is `!Send` due to platform internals. This is safe because
/// `AudioEngine` is only accessed behind a `Mutex` in `PlayerSystem`.
struct StreamHandle(#[allow(dead_code)] cpal::Stream);

unsafe impl Send for StreamHandle {}

pub(crate) struct AudioEngine {
    sample_rate: f64,
    channels: usize,
    is_running: bool,
    device_index: Option<usize>,
    _stream: Option<StreamHandle>,
}

impl AudioEngine {
    /// Query the output device and capture its native format. The stream
    /// itself is not opened until [`start`](AudioEngine::start).
    pub(crate) fn new(device_index: Option<usize>) -> Result<Self> {
        let (_, config) = open_device(device_index)?;

        Ok(Self {
            sample_rate: f64::from(config.sample_rate().0),
            channels: usize::from(config.channels()),
            is_running: false,
            device_index,
            _stream: None,
        })
    }

    /// Open the stream and hand `state` to its data callback.
    pub(crate) fn start(&mut self, state: PlayerCallbackState) -> Result<()> {
        if self.is_running {
            return Ok(());
        }

        let (device, config) = open_device(self.device_index)?;
        let format = config.sample_format();
        let config = config.into();
        let stream = match format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, state)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, state)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, state)?,
            other => {
                return Err(Error::InvalidConfig(format!(
                    "unsupported sample format {other:?}"
                )));
            }
        };
        stream.play()?;

        self._stream = Some(StreamHandle(stream));
        self.is_running = true;
        Ok(())
    }

    pub(crate) fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub(crate) fn channels(&self) -> usize {
        self.channels
    }

    pub(crate) fn is_running(&self) -> bool {
        self.is_running
    }

    pub(crate) fn device_name(&self) -> Result<String> {
        Ok(get_device(self.device_index)?.name()?)
    }

    pub(crate) fn list_devices() -> Result<Vec<String>> {
        let mut names = Vec::new();
        for (index, device) in cpal::default_host().output_devices()?.enumerate() {
            names.push(format!("{index}: {}", device.name()?));
        }
        Ok(names)
    }
}

fn open_device(index: Option<usize>) -> Result<(cpal::Device, cpal::SupportedStreamConfig)> {
    let device = get_device(index)?;
    let config = device.default_output_config()?;
    Ok((device, config))
}

fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    let Some(wanted) = index else {
        return host
            .default_output_device()
            .ok_or_else(|| Error::InvalidDevice("no output device available".into()));
    };

    let mut devices: Vec<_> = host.output_devices()?.collect();
    if wanted >= devices.len() {
        return Err(Error::InvalidDevice(format!(
            "device index {wanted} out of range ({} available)",
            devices.len()
        )));
    }
    Ok(devices.swap_remove(wanted))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    state: PlayerCallbackState,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let frames = data.len() / channels;

                crate::callback::process_audio(&state, frames);
                // SAFETY: process_audio has returned, so nothing else
                // references the scratch block for the rest of this
                // callback.
                let rendered = unsafe { state.rendered() };
                write_output(data, channels, rendered);
            }));

            if result.is_err() {
                output_silence(data);
            }
        },
        |_err| {},
        None,
    )?;

    Ok(stream)
}

/// Interleave the planar rendered block into the device buffer. Device
/// channels past the rendered width get silence.
#[inline]
fn write_output<T: cpal::SizedSample + cpal::FromSample<f32>>(
    data: &mut [T],
    channels: usize,
    rendered: &AudioBlock,
) {
    for (i, sample) in data.iter_mut().enumerate() {
        let frame = i / channels;
        let ch = i % channels;
        let value = if ch < rendered.channel_count() && frame < rendered.len() {
            rendered.channel(ch)[frame]
        } else {
            0.0
        };
        *sample = T::from_sample(value);
    }
}

/// Output silence (panic recovery).
#[inline]
fn output_silence<T: cpal::SizedSample + cpal::FromSample<f32>>(data: &mut [T]) {
    data.fill(T::from_sample(0.0));
}

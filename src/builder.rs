//! Builder for configuring and constructing an `EchoEngine`.

use crate::core::{PlayerConfig, PlayerSystemBuilder};
use crate::{EchoEngine, Result};

/// The sample rate is determined by the audio output device and cannot be
/// overridden. Use `engine.sample_rate()` after building to query the actual
/// rate.
///
/// Parameter values outside their documented ranges are clamped when the
/// engine starts; an unreasonable configuration (zero block length,
/// non-finite gains) fails the build instead.
///
/// # Example
///
/// ```ignore
/// use echoplay::prelude::*;
///
/// let engine = EchoEngine::builder()
///     .max_delay_seconds(5.0)
///     .delay_time_ms(200.0)
///     .feedback_gain(0.8)
///     .input_write_gain(0.3)
///     .build()?;
///
/// let sr = engine.sample_rate(); // e.g. 44100.0 or 48000.0
/// ```
pub struct EchoEngineBuilder {
    output_device: Option<usize>,
    max_delay_seconds: f32,
    expected_block_length: usize,
    delay_time_ms: f32,
    feedback_gain: f32,
    input_write_gain: f32,
    master_gain: f32,
}

impl Default for EchoEngineBuilder {
    fn default() -> Self {
        let config = PlayerConfig::default();
        Self {
            output_device: None,
            max_delay_seconds: config.max_delay_seconds,
            expected_block_length: config.expected_block_length,
            delay_time_ms: config.delay_time_ms,
            feedback_gain: config.feedback_gain,
            input_write_gain: config.input_write_gain,
            master_gain: config.master_gain,
        }
    }
}

impl EchoEngineBuilder {
    pub fn output_device(mut self, index: usize) -> Self {
        self.output_device = Some(index);
        self
    }

    /// Upper bound for the delay time, in seconds. Sizes the delay ring.
    /// Default: 2.0
    pub fn max_delay_seconds(mut self, seconds: f32) -> Self {
        self.max_delay_seconds = seconds;
        self
    }

    /// Block length hint for preallocation. Default: 1024
    pub fn expected_block_length(mut self, length: usize) -> Self {
        self.expected_block_length = length;
        self
    }

    /// Default: 500.0
    pub fn delay_time_ms(mut self, ms: f32) -> Self {
        self.delay_time_ms = ms;
        self
    }

    /// Default: 0.8
    pub fn feedback_gain(mut self, gain: f32) -> Self {
        self.feedback_gain = gain;
        self
    }

    /// Default: 0.3
    pub fn input_write_gain(mut self, gain: f32) -> Self {
        self.input_write_gain = gain;
        self
    }

    /// Default: 1.0
    pub fn master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain;
        self
    }

    pub fn build(self) -> Result<EchoEngine> {
        let config = PlayerConfig {
            max_delay_seconds: self.max_delay_seconds,
            expected_block_length: self.expected_block_length,
            delay_time_ms: self.delay_time_ms,
            feedback_gain: self.feedback_gain,
            input_write_gain: self.input_write_gain,
            master_gain: self.master_gain,
        };

        let mut core_builder = PlayerSystemBuilder::default().config(config);
        if let Some(device) = self.output_device {
            core_builder = core_builder.output_device(device);
        }

        let core = core_builder.build()?;
        Ok(EchoEngine::from_core(core))
    }
}

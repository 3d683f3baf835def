//! EchoEngine that coordinates playback and the echo pipeline

use crate::core::{PcmSource, PlayerSystem};
use crate::Result;

/// Main player engine.
///
/// EchoEngine wraps echoplay-core's PlayerSystem: one output stream, one
/// playback source and one feedback echo pipeline. All methods are callable
/// from any thread; parameter setters are lock-free and take effect at the
/// next block boundary on the audio thread.
///
/// # Example
///
/// ```ignore
/// use echoplay::prelude::*;
///
/// let engine = EchoEngine::builder().build()?;
///
/// engine.set_source(BufferSource::new(vec![samples]));
/// engine.play();
///
/// engine.set_delay_time_ms(350.0)
///     .set_feedback_gain(0.6)
///     .set_master_gain(0.8);
/// ```
pub struct EchoEngine {
    /// Core player system (always present)
    core: PlayerSystem,
}

impl EchoEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::EchoEngineBuilder {
        crate::EchoEngineBuilder::default()
    }

    /// Get sample rate
    pub fn sample_rate(&self) -> f64 {
        self.core.sample_rate()
    }

    /// Check if audio is running
    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    /// List available output devices
    pub fn list_output_devices() -> Result<Vec<String>> {
        PlayerSystem::list_output_devices()
    }

    /// Get current output device name
    pub fn current_output_device_name(&self) -> Result<String> {
        self.core.current_output_device_name()
    }

    /// Get number of processed channels
    pub fn channels(&self) -> usize {
        self.core.channels()
    }

    /// Resume playback from the current position.
    pub fn play(&self) -> &Self {
        self.core.play();
        self
    }

    /// Pause playback. The position and the echo tail survive for resume.
    pub fn pause(&self) -> &Self {
        self.core.pause();
        self
    }

    /// Stop playback: pause, rewind the material and clear the echo tail.
    pub fn stop(&self) -> &Self {
        self.core.stop();
        self
    }

    pub fn is_playing(&self) -> bool {
        self.core.is_playing()
    }

    /// Load playback material. Takes effect at the next block boundary.
    ///
    /// # Example
    /// ```ignore
    /// engine.set_source(BufferSource::new(vec![left, right]).looping(true));
    /// ```
    pub fn set_source(&self, source: impl PcmSource + 'static) -> &Self {
        self.core.set_source(source);
        self
    }

    /// Replace the current material with silence.
    pub fn clear_source(&self) -> &Self {
        self.core.clear_source();
        self
    }

    /// True once the current material has played to its end.
    pub fn source_finished(&self) -> bool {
        self.core.source_finished()
    }

    /// Playback position in seconds since the material started.
    pub fn position_seconds(&self) -> f64 {
        self.core.position_seconds()
    }

    /// Playback position in samples since the material started.
    pub fn position_samples(&self) -> u64 {
        self.core.position_samples()
    }

    /// Set the delay time in milliseconds (clamped to the configured maximum).
    pub fn set_delay_time_ms(&self, ms: f32) -> &Self {
        self.core.set_delay_time_ms(ms);
        self
    }

    pub fn delay_time_ms(&self) -> f32 {
        self.core.delay_time_ms()
    }

    /// Set the feedback gain (clamped to `0.0..=1.0`).
    pub fn set_feedback_gain(&self, gain: f32) -> &Self {
        self.core.set_feedback_gain(gain);
        self
    }

    pub fn feedback_gain(&self) -> f32 {
        self.core.feedback_gain()
    }

    /// Set the dry-write gain (clamped to `0.0..=1.0`).
    pub fn set_input_write_gain(&self, gain: f32) -> &Self {
        self.core.set_input_write_gain(gain);
        self
    }

    pub fn input_write_gain(&self) -> f32 {
        self.core.input_write_gain()
    }

    /// Set the master output gain (clamped to `0.0..=1.0`).
    pub fn set_master_gain(&self, gain: f32) -> &Self {
        self.core.set_master_gain(gain);
        self
    }

    pub fn master_gain(&self) -> f32 {
        self.core.master_gain()
    }

    /// Upper bound for the delay time, in seconds.
    pub fn max_delay_seconds(&self) -> f32 {
        self.core.max_delay_seconds()
    }

    /// Internal: create engine from builder
    pub(crate) fn from_core(core: PlayerSystem) -> Self {
        Self { core }
    }
}

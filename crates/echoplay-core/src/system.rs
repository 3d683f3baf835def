//! Player system - device stream, transport flags and parameter plumbing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::callback::{PlayerCallbackState, SourceCommand};
use crate::config::{self, PlayerConfig};
use crate::echo::{EchoProcessor, MAX_CHANNELS};
use crate::error::Result;
use crate::lockfree::{AtomicFlag, AtomicFloat};
use crate::output::AudioEngine;
use crate::source::{PcmSource, SilenceSource};

/// Running playback system: one device stream driving one echo pipeline.
///
/// All methods are callable from any thread. Parameter setters write shared
/// atomics, source changes travel over a command channel and are applied at
/// block boundaries on the audio thread.
pub struct PlayerSystem {
    engine: Mutex<AudioEngine>,
    commands: Sender<SourceCommand>,
    retired: Receiver<Box<dyn PcmSource>>,
    playing: Arc<AtomicFlag>,
    source_finished: Arc<AtomicFlag>,
    sample_position: Arc<AtomicU64>,
    delay_time_ms: Arc<AtomicFloat>,
    feedback_gain: Arc<AtomicFloat>,
    input_write_gain: Arc<AtomicFloat>,
    master_gain: Arc<AtomicFloat>,
    max_delay_seconds: f32,
    sample_rate: f64,
    channels: usize,
}

impl PlayerSystem {
    /// Create a new player system builder.
    pub fn builder() -> PlayerSystemBuilder {
        PlayerSystemBuilder::default()
    }

    /// Resume rendering from the current position.
    pub fn play(&self) {
        self.playing.set(true);
    }

    /// Halt rendering but keep the position and the echo tail for resume.
    pub fn pause(&self) {
        self.playing.set(false);
    }

    /// Halt rendering, rewind the material and clear the echo tail.
    pub fn stop(&self) {
        self.playing.set(false);
        let _ = self.commands.send(SourceCommand::Rewind);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    /// Swap in new playback material. Takes effect at the next block
    /// boundary; the outgoing source is dropped on this thread.
    pub fn set_source(&self, source: impl PcmSource + 'static) {
        let _ = self
            .commands
            .send(SourceCommand::Replace(Box::new(source)));
        self.drain_retired();
    }

    /// Replace the current material with silence.
    pub fn clear_source(&self) {
        let _ = self
            .commands
            .send(SourceCommand::Replace(Box::new(SilenceSource)));
        self.drain_retired();
    }

    /// True once the current material has played to its end. Cleared by
    /// [`set_source`](PlayerSystem::set_source) and
    /// [`stop`](PlayerSystem::stop).
    pub fn source_finished(&self) -> bool {
        self.source_finished.get()
    }

    /// Samples rendered since the material started.
    pub fn position_samples(&self) -> u64 {
        self.sample_position.load(Ordering::Relaxed)
    }

    pub fn position_seconds(&self) -> f64 {
        self.position_samples() as f64 / self.sample_rate
    }

    /// Delay time in milliseconds, clamped to `0..=max_delay_seconds * 1000`.
    /// Non-finite values are ignored.
    pub fn set_delay_time_ms(&self, ms: f32) {
        if !ms.is_finite() {
            return;
        }
        self.delay_time_ms
            .set(ms.clamp(0.0, self.max_delay_seconds * 1000.0));
    }

    pub fn delay_time_ms(&self) -> f32 {
        self.delay_time_ms.get()
    }

    /// Feedback gain, clamped to `0.0..=1.0`.
    pub fn set_feedback_gain(&self, gain: f32) {
        if !gain.is_finite() {
            return;
        }
        self.feedback_gain.set(gain.clamp(0.0, 1.0));
    }

    pub fn feedback_gain(&self) -> f32 {
        self.feedback_gain.get()
    }

    /// Dry-write gain, clamped to `0.0..=1.0`.
    pub fn set_input_write_gain(&self, gain: f32) {
        if !gain.is_finite() {
            return;
        }
        self.input_write_gain.set(gain.clamp(0.0, 1.0));
    }

    pub fn input_write_gain(&self) -> f32 {
        self.input_write_gain.get()
    }

    /// Master output gain, clamped to `0.0..=1.0`.
    pub fn set_master_gain(&self, gain: f32) {
        if !gain.is_finite() {
            return;
        }
        self.master_gain.set(gain.clamp(0.0, 1.0));
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain.get()
    }

    /// Upper bound for the delay time, in seconds.
    pub fn max_delay_seconds(&self) -> f32 {
        self.max_delay_seconds
    }

    /// Get sample rate.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Get number of processed channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Check if audio is running.
    pub fn is_running(&self) -> bool {
        self.engine.lock().is_running()
    }

    /// List available output devices.
    pub fn list_output_devices() -> Result<Vec<String>> {
        AudioEngine::list_devices()
    }

    /// Get the name of the current output device.
    pub fn current_output_device_name(&self) -> Result<String> {
        self.engine.lock().device_name()
    }

    /// Drop sources the audio thread has handed back.
    fn drain_retired(&self) {
        while self.retired.try_recv().is_ok() {}
    }
}

/// Builder for PlayerSystem.
#[derive(Default)]
pub struct PlayerSystemBuilder {
    device_index: Option<usize>,
    config: PlayerConfig,
}

impl PlayerSystemBuilder {
    /// Set output device index (default: the host's default output).
    pub fn output_device(mut self, index: usize) -> Self {
        self.device_index = Some(index);
        self
    }

    /// Set the player configuration.
    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build and start the audio system.
    pub fn build(self) -> Result<PlayerSystem> {
        self.config.validate()?;

        let mut engine = AudioEngine::new(self.device_index)?;
        let sample_rate = engine.sample_rate();
        config::validate_sample_rate(sample_rate)?;
        let channels = engine.channels().clamp(1, MAX_CHANNELS);

        let mut processor = EchoProcessor::builder()
            .channels(channels)
            .max_delay_seconds(self.config.max_delay_seconds)
            .delay_time_ms(self.config.delay_time_ms)
            .feedback_gain(self.config.feedback_gain)
            .input_write_gain(self.config.input_write_gain)
            .master_gain(self.config.master_gain)
            .build();
        processor.prepare(sample_rate, self.config.expected_block_length);

        let delay_time_ms = processor.delay_time_ms();
        let feedback_gain = processor.feedback_gain();
        let input_write_gain = processor.input_write_gain();
        let master_gain = processor.master_gain();
        let max_delay_seconds = processor.max_delay_seconds();

        let (command_tx, command_rx) = crossbeam_channel::unbounded();
        let (retired_tx, retired_rx) = crossbeam_channel::unbounded();
        let playing = Arc::new(AtomicFlag::new(false));
        let source_finished = Arc::new(AtomicFlag::new(false));
        let sample_position = Arc::new(AtomicU64::new(0));

        let state = PlayerCallbackState::new(
            processor,
            channels,
            self.config.expected_block_length,
            command_rx,
            retired_tx,
            Arc::clone(&playing),
            Arc::clone(&source_finished),
            Arc::clone(&sample_position),
        );
        engine.start(state)?;

        tracing::info!(sample_rate, channels, "player system started");

        Ok(PlayerSystem {
            engine: Mutex::new(engine),
            commands: command_tx,
            retired: retired_rx,
            playing,
            source_finished,
            sample_position,
            delay_time_ms,
            feedback_gain,
            input_write_gain,
            master_gain,
            max_delay_seconds,
            sample_rate,
            channels,
        })
    }
}

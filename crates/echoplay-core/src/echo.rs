//! Feedback echo processor built over [`DelayLine`].
//!
//! One processor owns one delay line and runs a fixed three-step sequence
//! per channel per block, in place on the block:
//!
//! 1. write the dry input into the ring, scaled by the input write gain
//! 2. add the delayed tap into the block, so the block now carries dry + wet
//! 3. accumulate the wet output back into the ring, scaled by the feedback
//!    gain
//!
//! Writing the dry signal before reading the tap means the tap at step 2
//! never observes this block's own feedback contribution, and accumulating
//! after the tap read folds the full wet output into future repeats. The
//! cursor advances once after all channels, then the master gain scales the
//! block.
//!
//! All tunable parameters are shared [`AtomicFloat`]s, read once per block,
//! so a control thread can retarget them without locking the audio thread.

use std::sync::Arc;

use crate::block::AudioBlock;
use crate::delay_line::DelayLine;
use crate::gain::GainStage;
use crate::lockfree::AtomicFloat;

/// Channel ceiling for the echo pipeline. Wider devices get the first two
/// channels; the rest are zeroed at the output boundary.
pub const MAX_CHANNELS: usize = 2;

/// Per-stream state that only exists between `prepare` and `release`.
#[derive(Debug)]
struct Stream {
    delay: DelayLine,
    sample_rate: f64,
}

/// Delay/echo effect with lock-free parameter control.
///
/// Starts uninitialized; [`prepare`](EchoProcessor::prepare) allocates the
/// ring for a concrete sample rate and block length, and
/// [`release`](EchoProcessor::release) drops it again. Processing while
/// uninitialized silences the block instead of panicking.
#[derive(Debug)]
pub struct EchoProcessor {
    channels: usize,
    max_delay_seconds: f32,
    delay_time_ms: Arc<AtomicFloat>,
    feedback_gain: Arc<AtomicFloat>,
    input_write_gain: Arc<AtomicFloat>,
    master: GainStage,
    stream: Option<Stream>,
}

impl EchoProcessor {
    pub fn builder() -> EchoProcessorBuilder {
        EchoProcessorBuilder::default()
    }

    /// Allocate the delay ring for `sample_rate` and `expected_block_length`.
    ///
    /// Capacity is the maximum delay in samples rounded up, plus one block of
    /// headroom so a full write never collides with the oldest readable
    /// sample. Calling this on an already prepared processor reallocates for
    /// the new rate and discards the old tail.
    pub fn prepare(&mut self, sample_rate: f64, expected_block_length: usize) {
        // Keep the multiply in f32: widening the stored bound to f64 first
        // inflates the ceiling (0.05 s at 48 kHz turns into 2401, not 2400).
        let capacity =
            (self.max_delay_seconds * sample_rate as f32).ceil() as usize + expected_block_length;
        self.stream = Some(Stream {
            delay: DelayLine::new(self.channels, capacity),
            sample_rate,
        });
        tracing::debug!(sample_rate, capacity, "echo processor prepared");
    }

    /// Drop the delay ring and return to the uninitialized state.
    pub fn release(&mut self) {
        self.stream = None;
        tracing::debug!("echo processor released");
    }

    /// Zero the ring tail without reallocating. The stream stays prepared.
    pub fn reset(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            stream.delay.clear();
        }
    }

    pub fn is_ready(&self) -> bool {
        self.stream.is_some()
    }

    /// Ring capacity in samples, if prepared.
    pub fn capacity(&self) -> Option<usize> {
        self.stream.as_ref().map(|s| s.delay.capacity())
    }

    pub fn channel_count(&self) -> usize {
        self.channels
    }

    /// Upper bound for the delay time, in seconds. Fixed at build time.
    pub fn max_delay_seconds(&self) -> f32 {
        self.max_delay_seconds
    }

    /// Run the echo pipeline in place on `block`.
    pub fn process(&mut self, block: &mut AudioBlock) {
        let Some(stream) = self.stream.as_mut() else {
            block.silence();
            return;
        };
        debug_assert_eq!(block.channel_count(), self.channels);
        let length = block.len();

        // One parameter read per block; the audio thread never re-reads
        // mid-block, so a concurrent setter lands on a block boundary.
        let delay_ms = self.delay_time_ms.get();
        let feedback = self.feedback_gain.get();
        let dry_write = self.input_write_gain.get();
        let delay_samples =
            delay_in_samples(stream.sample_rate, delay_ms, stream.delay.capacity(), length);

        for ch in 0..self.channels.min(block.channel_count()) {
            stream
                .delay
                .write_with_ramp(ch, block.channel(ch), dry_write, dry_write);
            stream.delay.read_delayed(ch, delay_samples, block.channel_mut(ch));
            stream
                .delay
                .accumulate_with_ramp(ch, block.channel(ch), feedback, feedback);
        }
        stream.delay.advance(length);
        self.master.apply(block);
    }

    /// Delay time in milliseconds, clamped to `0..=max_delay_seconds * 1000`.
    /// Non-finite values are ignored and the previous value stays in effect.
    pub fn set_delay_time_ms(&self, ms: f32) {
        if !ms.is_finite() {
            return;
        }
        self.delay_time_ms
            .set(ms.clamp(0.0, self.max_delay_seconds * 1000.0));
    }

    /// Feedback gain, clamped to `0.0..=1.0`.
    pub fn set_feedback_gain(&self, gain: f32) {
        if !gain.is_finite() {
            return;
        }
        self.feedback_gain.set(gain.clamp(0.0, 1.0));
    }

    /// Dry-write gain, clamped to `0.0..=1.0`.
    pub fn set_input_write_gain(&self, gain: f32) {
        if !gain.is_finite() {
            return;
        }
        self.input_write_gain.set(gain.clamp(0.0, 1.0));
    }

    /// Master output gain, clamped to `0.0..=1.0`.
    pub fn set_master_gain(&self, gain: f32) {
        if !gain.is_finite() {
            return;
        }
        self.master.set_gain(gain);
    }

    /// Shared handle to the delay time parameter.
    pub fn delay_time_ms(&self) -> Arc<AtomicFloat> {
        Arc::clone(&self.delay_time_ms)
    }

    /// Shared handle to the feedback gain parameter.
    pub fn feedback_gain(&self) -> Arc<AtomicFloat> {
        Arc::clone(&self.feedback_gain)
    }

    /// Shared handle to the dry-write gain parameter.
    pub fn input_write_gain(&self) -> Arc<AtomicFloat> {
        Arc::clone(&self.input_write_gain)
    }

    /// Shared handle to the master gain parameter.
    pub fn master_gain(&self) -> Arc<AtomicFloat> {
        self.master.gain()
    }
}

impl Default for EchoProcessor {
    fn default() -> Self {
        EchoProcessorBuilder::default().build()
    }
}

/// Builder for [`EchoProcessor`]. Out-of-range values are clamped at build
/// time, so construction never fails.
#[derive(Debug, Clone)]
pub struct EchoProcessorBuilder {
    channels: usize,
    max_delay_seconds: f32,
    delay_time_ms: f32,
    feedback_gain: f32,
    input_write_gain: f32,
    master_gain: f32,
}

impl Default for EchoProcessorBuilder {
    fn default() -> Self {
        Self {
            channels: MAX_CHANNELS,
            max_delay_seconds: 2.0,
            delay_time_ms: 500.0,
            feedback_gain: 0.8,
            input_write_gain: 0.3,
            master_gain: 1.0,
        }
    }
}

impl EchoProcessorBuilder {
    pub fn channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Upper bound for the delay time, in seconds. Sets the ring size at
    /// prepare time.
    pub fn max_delay_seconds(mut self, seconds: f32) -> Self {
        self.max_delay_seconds = seconds;
        self
    }

    pub fn delay_time_ms(mut self, ms: f32) -> Self {
        self.delay_time_ms = ms;
        self
    }

    pub fn feedback_gain(mut self, gain: f32) -> Self {
        self.feedback_gain = gain;
        self
    }

    pub fn input_write_gain(mut self, gain: f32) -> Self {
        self.input_write_gain = gain;
        self
    }

    pub fn master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain;
        self
    }

    pub fn build(self) -> EchoProcessor {
        let processor = EchoProcessor {
            channels: self.channels.clamp(1, MAX_CHANNELS),
            max_delay_seconds: self.max_delay_seconds.clamp(0.01, 60.0),
            delay_time_ms: Arc::new(AtomicFloat::new(0.0)),
            feedback_gain: Arc::new(AtomicFloat::new(0.0)),
            input_write_gain: Arc::new(AtomicFloat::new(0.0)),
            master: GainStage::new(1.0),
            stream: None,
        };
        processor.set_delay_time_ms(self.delay_time_ms);
        processor.set_feedback_gain(self.feedback_gain);
        processor.set_input_write_gain(self.input_write_gain);
        processor.set_master_gain(self.master_gain);
        processor
    }
}

/// Delay time in whole samples for the current stream, clamped so the read
/// tap stays at least one block plus one sample behind the write cursor.
fn delay_in_samples(sample_rate: f64, delay_ms: f32, capacity: usize, block_length: usize) -> usize {
    let ideal = (sample_rate * delay_ms.max(0.0) as f64 / 1000.0) as usize;
    ideal.min(capacity.saturating_sub(block_length + 1))
}

//! Test helpers and fixtures for echoplay integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (passthrough, unity gain)
//! - `DSP_EPSILON` (1e-4): Accumulated DSP rounding
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

pub mod tolerances;

use echoplay::{AudioBlock, EchoProcessor};

/// Default test sample rate. Chosen so a 10 ms delay is exactly
/// [`TEST_BLOCK_SIZE`] samples.
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Standard block size for deterministic testing
pub const TEST_BLOCK_SIZE: usize = 480;

/// Delay time that lands exactly one block behind the write cursor.
pub const ONE_BLOCK_MS: f32 = 10.0;

/// Single-channel processor prepared at the test rate and block size, with
/// 50 ms of ring headroom and unity master gain.
pub fn prepared_processor(delay_ms: f32, feedback_gain: f32, input_write_gain: f32) -> EchoProcessor {
    let mut processor = EchoProcessor::builder()
        .channels(1)
        .max_delay_seconds(0.05)
        .delay_time_ms(delay_ms)
        .feedback_gain(feedback_gain)
        .input_write_gain(input_write_gain)
        .build();
    processor.prepare(TEST_SAMPLE_RATE, TEST_BLOCK_SIZE);
    processor
}

/// Block with a unit impulse at sample 0 of every channel.
pub fn impulse_block(channels: usize, len: usize) -> AudioBlock {
    let mut block = AudioBlock::new(channels, len);
    for ch in 0..channels {
        block.channel_mut(ch)[0] = 1.0;
    }
    block
}

/// All-zero block.
pub fn silent_block(channels: usize, len: usize) -> AudioBlock {
    AudioBlock::new(channels, len)
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

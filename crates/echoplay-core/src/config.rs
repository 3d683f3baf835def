//! Player configuration.

use crate::error::{Error, Result};

/// Sample-rate sanity bounds for any device or host rate entering the system.
const MIN_SAMPLE_RATE: f64 = 8_000.0;
const MAX_SAMPLE_RATE: f64 = 384_000.0;

/// Build-time knobs for the player and its echo pipeline.
///
/// The gain defaults are the reference tuning promoted to parameters: a soft
/// dry write (0.3) with a stronger feedback write (0.8). All of these are
/// starting values; the matching setters stay live at control rate after the
/// player is built.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Largest configurable echo delay; fixes the ring allocation.
    pub max_delay_seconds: f32,
    /// Block-length hint used to size the ring margin and scratch block.
    pub expected_block_length: usize,
    /// Initial echo delay in milliseconds.
    pub delay_time_ms: f32,
    /// Initial feedback attenuation, 0..=1.
    pub feedback_gain: f32,
    /// Initial dry-write attenuation, 0..=1.
    pub input_write_gain: f32,
    /// Initial master output gain, 0..=1.
    pub master_gain: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_delay_seconds: 2.0,
            expected_block_length: 1024,
            delay_time_ms: 500.0,
            feedback_gain: 0.8,
            input_write_gain: 0.3,
            master_gain: 1.0,
        }
    }
}

impl PlayerConfig {
    /// Check structural sanity. Out-of-range gains are not errors here; they
    /// are clamped where they enter the pipeline.
    pub fn validate(&self) -> Result<()> {
        if !self.max_delay_seconds.is_finite() || self.max_delay_seconds <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_delay_seconds must be positive, got {}",
                self.max_delay_seconds
            )));
        }
        if self.max_delay_seconds > 60.0 {
            return Err(Error::InvalidConfig(format!(
                "max_delay_seconds must be at most 60, got {}",
                self.max_delay_seconds
            )));
        }
        if !(16..=16_384).contains(&self.expected_block_length) {
            return Err(Error::InvalidConfig(format!(
                "expected_block_length must be between 16 and 16384, got {}",
                self.expected_block_length
            )));
        }
        if !self.delay_time_ms.is_finite() || self.delay_time_ms < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "delay_time_ms must be non-negative, got {}",
                self.delay_time_ms
            )));
        }
        for (name, value) in [
            ("feedback_gain", self.feedback_gain),
            ("input_write_gain", self.input_write_gain),
            ("master_gain", self.master_gain),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

/// Reject sample rates no real device or host would report.
pub fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        return Err(Error::InvalidConfig(format!(
            "Sample rate {sample_rate} Hz outside supported range {MIN_SAMPLE_RATE}-{MAX_SAMPLE_RATE} Hz"
        )));
    }
    Ok(())
}

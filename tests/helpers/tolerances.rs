//! Tolerance constants for audio testing.
//!
//! Different checks need different precision: pick the loosest constant
//! that still proves the property.

/// Floating point rounding only. Use for operations that should be
/// mathematically exact (passthrough, unity gain, single multiplies).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Accumulated rounding across the write/tap/feedback chain.
pub const DSP_EPSILON: f32 = 1e-4;

/// Values below this count as silence (~-80dB).
pub const SILENCE_THRESHOLD: f32 = 0.0001;

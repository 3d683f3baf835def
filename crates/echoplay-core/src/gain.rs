//! Output gain stage with a lock-free control parameter.

use std::sync::Arc;

use crate::block::AudioBlock;
use crate::lockfree::AtomicFloat;

/// Master gain applied to a whole block. The gain value lives in an
/// [`AtomicFloat`] so a control thread can retarget it while the audio
/// thread is scaling samples; the audio thread reads it once per block.
///
/// Gain is clamped to `0.0..=1.0` on every write. Unity gain still runs the
/// multiply loop, which keeps the output bit pattern stable across gain
/// changes that pass through 1.0.
#[derive(Debug, Clone)]
pub struct GainStage {
    gain: Arc<AtomicFloat>,
}

impl GainStage {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: Arc::new(AtomicFloat::new(gain.clamp(0.0, 1.0))),
        }
    }

    /// Shared handle to the gain parameter for control-side updates.
    pub fn gain(&self) -> Arc<AtomicFloat> {
        Arc::clone(&self.gain)
    }

    pub fn current_gain(&self) -> f32 {
        self.gain.get()
    }

    pub fn set_gain(&self, gain: f32) {
        self.gain.set(gain.clamp(0.0, 1.0));
    }

    /// Scale every sample of every channel by the current gain.
    pub fn apply(&self, block: &mut AudioBlock) {
        let gain = self.gain.get();
        for channel in 0..block.channel_count() {
            for sample in block.channel_mut(channel) {
                *sample *= gain;
            }
        }
    }
}

impl Default for GainStage {
    fn default() -> Self {
        Self::new(1.0)
    }
}

//! Lock-free primitives for the control-rate parameter plane.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cache-line aligned atomic f32.
///
/// One of these backs each control-rate parameter: written by the UI/control
/// thread, read once per block by the audio thread. A value may change
/// between blocks but never tears within a word.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic bool. Backs the transport flags (playing,
/// source finished).
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }
}

impl Clone for AtomicFlag {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_retarget_is_visible() {
        let gain = AtomicFloat::new(0.8);
        assert_eq!(gain.get(), 0.8);
        gain.set(0.5);
        assert_eq!(gain.get(), 0.5);
    }

    #[test]
    fn test_float_clone_snapshots_value() {
        let gain = AtomicFloat::new(0.25);
        let copy = gain.clone();
        gain.set(0.75);
        assert_eq!(copy.get(), 0.25);
    }

    #[test]
    fn test_flag_toggles() {
        let playing = AtomicFlag::new(false);
        assert!(!playing.get());
        playing.set(true);
        assert!(playing.get());
        playing.set(false);
        assert!(!playing.get());
    }
}

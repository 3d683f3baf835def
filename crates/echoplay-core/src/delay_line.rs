//! Multi-channel circular delay line with a shared write cursor.

/// Fixed-capacity ring storage, one ring per channel, addressed by a single
/// write cursor shared across channels.
///
/// The cursor never moves inside a transfer; callers run all per-channel
/// writes and reads for a block against one cursor value, then call
/// [`advance`](DelayLine::advance) exactly once. Every operation splits into
/// at most two contiguous segments when it crosses the capacity boundary,
/// and the two segment lengths always sum to the transfer length.
///
/// Transfers longer than the ring are truncated to one traversal; capacity
/// sizing upstream makes that case unreachable in practice.
#[derive(Debug, Clone)]
pub struct DelayLine {
    rings: Vec<Vec<f32>>,
    capacity: usize,
    write_pos: usize,
}

impl DelayLine {
    /// Ring storage for `channel_count` channels of `capacity` samples each,
    /// zero-filled, cursor at 0.
    pub fn new(channel_count: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rings: vec![vec![0.0; capacity]; channel_count.max(1)],
            capacity,
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn channel_count(&self) -> usize {
        self.rings.len()
    }

    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    /// Raw ring contents for one channel. Diagnostic access; the pipeline
    /// itself only goes through the cursor-relative operations.
    pub fn ring(&self, channel: usize) -> &[f32] {
        &self.rings[channel]
    }

    /// Overwrite `source.len()` samples at the cursor, scaling by a gain that
    /// ramps linearly from `start_gain` to `end_gain` across the transfer.
    /// Sample `i` is scaled by `start + (end - start) * i / len`, so the ramp
    /// lands on `end_gain` one sample past the block and consecutive blocks
    /// chain without a step.
    pub fn write_with_ramp(&mut self, channel: usize, source: &[f32], start_gain: f32, end_gain: f32) {
        let len = source.len().min(self.capacity);
        if len == 0 {
            return;
        }
        let step = (end_gain - start_gain) / len as f32;
        let mut gain = start_gain;

        let ring = &mut self.rings[channel];
        let first = len.min(self.capacity - self.write_pos);
        for (dst, src) in ring[self.write_pos..self.write_pos + first]
            .iter_mut()
            .zip(&source[..first])
        {
            *dst = src * gain;
            gain += step;
        }
        let second = len - first;
        for (dst, src) in ring[..second].iter_mut().zip(&source[first..len]) {
            *dst = src * gain;
            gain += step;
        }
    }

    /// Like [`write_with_ramp`](DelayLine::write_with_ramp) but adds the
    /// scaled samples to the existing ring contents. This is the feedback
    /// injection path.
    pub fn accumulate_with_ramp(
        &mut self,
        channel: usize,
        source: &[f32],
        start_gain: f32,
        end_gain: f32,
    ) {
        let len = source.len().min(self.capacity);
        if len == 0 {
            return;
        }
        let step = (end_gain - start_gain) / len as f32;
        let mut gain = start_gain;

        let ring = &mut self.rings[channel];
        let first = len.min(self.capacity - self.write_pos);
        for (dst, src) in ring[self.write_pos..self.write_pos + first]
            .iter_mut()
            .zip(&source[..first])
        {
            *dst += src * gain;
            gain += step;
        }
        let second = len - first;
        for (dst, src) in ring[..second].iter_mut().zip(&source[first..len]) {
            *dst += src * gain;
            gain += step;
        }
    }

    /// Add `destination.len()` samples into `destination`, starting
    /// `delay_samples` behind the cursor. Adding (rather than overwriting)
    /// lets the wet tap sum onto whatever dry signal is already in the
    /// destination. Never reads samples more recent than `delay_samples`
    /// behind the cursor.
    pub fn read_delayed(&self, channel: usize, delay_samples: usize, destination: &mut [f32]) {
        debug_assert!(delay_samples < self.capacity, "delay exceeds ring capacity");
        let len = destination.len().min(self.capacity);
        let delay = delay_samples % self.capacity;
        let read_pos = (self.write_pos + self.capacity - delay) % self.capacity;

        let ring = &self.rings[channel];
        let first = len.min(self.capacity - read_pos);
        for (dst, src) in destination[..first]
            .iter_mut()
            .zip(&ring[read_pos..read_pos + first])
        {
            *dst += src;
        }
        let second = len - first;
        for (dst, src) in destination[first..len].iter_mut().zip(&ring[..second]) {
            *dst += src;
        }
    }

    /// Move the cursor forward. Called exactly once per processed block,
    /// after all per-channel writes and reads, so every channel sees the
    /// same cursor value for the whole block.
    #[inline]
    pub fn advance(&mut self, length: usize) {
        self.write_pos = (self.write_pos + length) % self.capacity;
    }

    /// Zero all rings and reset the cursor. Reinitialization only; never
    /// called mid-stream.
    pub fn clear(&mut self) {
        for ring in &mut self.rings {
            ring.fill(0.0);
        }
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_write_then_raw_read_no_wrap() {
        let mut line = DelayLine::new(1, 16);
        let source = [1.0, 2.0, 3.0, 4.0];
        line.write_with_ramp(0, &source, 1.0, 1.0);
        assert_eq!(&line.ring(0)[..4], &source);
        assert!(line.ring(0)[4..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_write_splits_across_wrap() {
        // Cursor three samples from the end, transfer of ten: the classic
        // tail-then-head split.
        let mut line = DelayLine::new(1, 32);
        line.advance(29);
        let source: Vec<f32> = (1..=10).map(|v| v as f32).collect();
        line.write_with_ramp(0, &source, 1.0, 1.0);

        assert_eq!(&line.ring(0)[29..32], &source[..3]);
        assert_eq!(&line.ring(0)[..7], &source[3..]);
        // Both segment lengths sum to the transfer length.
        assert_eq!((32 - 29) + 7, source.len());
        // Untouched middle stays zero.
        assert!(line.ring(0)[7..29].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_write_preserves_content_outside_range() {
        let mut line = DelayLine::new(1, 8);
        line.write_with_ramp(0, &[9.0; 7], 1.0, 1.0);
        line.advance(2);
        line.write_with_ramp(0, &[1.0, 1.0, 1.0], 1.0, 1.0);

        assert_eq!(&line.ring(0)[2..5], &[1.0, 1.0, 1.0]);
        assert_eq!(line.ring(0)[0], 9.0);
        assert_eq!(line.ring(0)[1], 9.0);
        assert_eq!(line.ring(0)[5], 9.0);
        assert_eq!(line.ring(0)[6], 9.0);
        assert_eq!(line.ring(0)[7], 0.0);
    }

    #[test]
    fn test_ramp_gain_per_sample() {
        let mut line = DelayLine::new(1, 8);
        line.write_with_ramp(0, &[1.0, 1.0, 1.0, 1.0], 0.0, 1.0);
        assert_eq!(&line.ring(0)[..4], &[0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_accumulate_adds_to_existing() {
        let mut line = DelayLine::new(1, 8);
        line.write_with_ramp(0, &[1.0, 1.0, 1.0], 1.0, 1.0);
        line.accumulate_with_ramp(0, &[1.0, 1.0, 1.0], 0.5, 0.5);
        assert_eq!(&line.ring(0)[..3], &[1.5, 1.5, 1.5]);
    }

    #[test]
    fn test_read_delayed_returns_past_samples() {
        let mut line = DelayLine::new(1, 16);
        line.write_with_ramp(0, &[1.0, 2.0, 3.0, 4.0], 1.0, 1.0);
        line.advance(4);

        let mut dst = [0.0; 4];
        line.read_delayed(0, 4, &mut dst);
        assert_eq!(dst, [1.0, 2.0, 3.0, 4.0]);

        let mut dst = [0.0; 2];
        line.read_delayed(0, 2, &mut dst);
        assert_eq!(dst, [3.0, 4.0]);
    }

    #[test]
    fn test_read_delayed_adds_into_destination() {
        let mut line = DelayLine::new(1, 16);
        line.write_with_ramp(0, &[1.0, 1.0], 1.0, 1.0);
        line.advance(2);

        let mut dst = [10.0, 10.0];
        line.read_delayed(0, 2, &mut dst);
        assert_eq!(dst, [11.0, 11.0]);
    }

    #[test]
    fn test_read_delayed_across_wrap() {
        let mut line = DelayLine::new(1, 8);
        line.advance(6);
        line.write_with_ramp(0, &[1.0, 2.0, 3.0, 4.0], 1.0, 1.0);
        line.advance(4);
        // Cursor now at 2; the write landed on 6,7,0,1.
        let mut dst = [0.0; 4];
        line.read_delayed(0, 4, &mut dst);
        assert_eq!(dst, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_advance_wraps_modulo_capacity() {
        let mut line = DelayLine::new(2, 10);
        line.advance(7);
        assert_eq!(line.write_position(), 7);
        line.advance(7);
        assert_eq!(line.write_position(), 4);
        line.advance(25);
        assert_eq!(line.write_position(), 9);
    }

    #[test]
    fn test_cursor_phase_after_block_sequence() {
        let capacity = 221;
        let block = 64;
        let mut line = DelayLine::new(2, capacity);
        for blocks in 1..=40 {
            line.advance(block);
            assert_eq!(line.write_position(), (blocks * block) % capacity);
        }
    }

    #[test]
    fn test_channels_are_independent() {
        let mut line = DelayLine::new(2, 8);
        line.write_with_ramp(0, &[5.0, 5.0], 1.0, 1.0);
        assert_eq!(&line.ring(0)[..2], &[5.0, 5.0]);
        assert!(line.ring(1).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_clear_zeroes_and_resets_cursor() {
        let mut line = DelayLine::new(1, 8);
        line.write_with_ramp(0, &[1.0; 5], 1.0, 1.0);
        line.advance(5);
        line.clear();
        assert_eq!(line.write_position(), 0);
        assert!(line.ring(0).iter().all(|&s| s == 0.0));
    }

    /// Deterministic nonzero test signal.
    fn signal(seed: u32, len: usize) -> Vec<f32> {
        let mut state = seed.wrapping_mul(2_654_435_761).max(1);
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                0.1 + (state >> 8) as f32 / (1u32 << 24) as f32
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_wrap_write_reproduces_source(
            capacity in 8usize..256,
            start in 0usize..512,
            len in 1usize..255,
            seed in any::<u32>(),
        ) {
            prop_assume!(len < capacity);
            let mut line = DelayLine::new(1, capacity);
            line.advance(start);
            let pos = line.write_position();
            let source = signal(seed, len);
            line.write_with_ramp(0, &source, 1.0, 1.0);

            for (i, &expected) in source.iter().enumerate() {
                prop_assert_eq!(line.ring(0)[(pos + i) % capacity], expected);
            }
            let written: usize = line.ring(0).iter().filter(|&&s| s != 0.0).count();
            prop_assert_eq!(written, len);
        }

        #[test]
        fn prop_read_delayed_roundtrip(
            capacity in 16usize..256,
            start in 0usize..512,
            len in 1usize..64,
            seed in any::<u32>(),
        ) {
            prop_assume!(len < capacity);
            let mut line = DelayLine::new(1, capacity);
            line.advance(start);
            let source = signal(seed, len);
            line.write_with_ramp(0, &source, 1.0, 1.0);
            line.advance(len);

            let mut dst = vec![0.0; len];
            line.read_delayed(0, len, &mut dst);
            prop_assert_eq!(dst, source);
        }
    }
}

//! Audio sources that feed the playback pipeline.

use crate::block::AudioBlock;

/// Producer of non-interleaved PCM blocks.
///
/// `fill_next` must write every sample of every channel of the block, padding
/// with zeros past the end of the material, and returns `false` once the
/// source has nothing further to produce. Implementations run on the audio
/// thread, so they must not allocate or block.
pub trait PcmSource: Send {
    fn fill_next(&mut self, block: &mut AudioBlock) -> bool;

    /// Rewind to the start of the material.
    fn reset(&mut self);
}

/// Source that produces silence forever. Stands in when no clip is loaded.
#[derive(Debug, Default, Clone)]
pub struct SilenceSource;

impl PcmSource for SilenceSource {
    fn fill_next(&mut self, block: &mut AudioBlock) -> bool {
        block.silence();
        true
    }

    fn reset(&mut self) {}
}

/// In-memory clip played back block by block, optionally looping.
///
/// Channel rows may have uneven lengths; playback length is the shortest
/// row. A mono clip fans out to every output channel, and a clip narrower
/// than the block leaves the extra channels silent.
#[derive(Debug, Clone)]
pub struct BufferSource {
    channels: Vec<Vec<f32>>,
    clip_len: usize,
    position: usize,
    looping: bool,
}

impl BufferSource {
    pub fn new(channels: Vec<Vec<f32>>) -> Self {
        let clip_len = channels.iter().map(Vec::len).min().unwrap_or(0);
        Self {
            channels,
            clip_len,
            position: 0,
            looping: false,
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Playback length in samples.
    pub fn len(&self) -> usize {
        self.clip_len
    }

    pub fn is_empty(&self) -> bool {
        self.clip_len == 0
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl PcmSource for BufferSource {
    fn fill_next(&mut self, block: &mut AudioBlock) -> bool {
        block.silence();
        if self.clip_len == 0 {
            return self.looping;
        }

        let mono = self.channels.len() == 1;
        let mut filled = 0;
        while filled < block.len() {
            if self.position == self.clip_len {
                if !self.looping {
                    break;
                }
                self.position = 0;
            }
            let run = (block.len() - filled).min(self.clip_len - self.position);
            for ch in 0..block.channel_count() {
                let row = if mono { 0 } else { ch };
                let Some(source) = self.channels.get(row) else {
                    continue;
                };
                block.channel_mut(ch)[filled..filled + run]
                    .copy_from_slice(&source[self.position..self.position + run]);
            }
            self.position += run;
            filled += run;
        }

        self.looping || self.position < self.clip_len
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_clip(len: usize) -> Vec<f32> {
        (0..len).map(|v| v as f32).collect()
    }

    #[test]
    fn test_silence_source_never_finishes() {
        let mut source = SilenceSource;
        let mut block = AudioBlock::new(2, 8);
        block.channel_mut(0).fill(1.0);
        assert!(source.fill_next(&mut block));
        assert!(block.channel(0).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_buffer_source_sequential_blocks() {
        let mut source = BufferSource::new(vec![ramp_clip(8), ramp_clip(8)]);
        let mut block = AudioBlock::new(2, 4);

        assert!(source.fill_next(&mut block));
        assert_eq!(block.channel(0), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(block.channel(1), &[0.0, 1.0, 2.0, 3.0]);

        assert!(!source.fill_next(&mut block));
        assert_eq!(block.channel(0), &[4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_buffer_source_pads_tail_with_zeros() {
        let mut source = BufferSource::new(vec![ramp_clip(6)]);
        let mut block = AudioBlock::new(1, 4);

        assert!(source.fill_next(&mut block));
        assert!(!source.fill_next(&mut block));
        assert_eq!(block.channel(0), &[4.0, 5.0, 0.0, 0.0]);

        // Exhausted: all silence from here on.
        assert!(!source.fill_next(&mut block));
        assert!(block.channel(0).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_buffer_source_loops_across_block_boundary() {
        let mut source = BufferSource::new(vec![ramp_clip(3)]).looping(true);
        let mut block = AudioBlock::new(1, 4);

        assert!(source.fill_next(&mut block));
        assert_eq!(block.channel(0), &[0.0, 1.0, 2.0, 0.0]);

        assert!(source.fill_next(&mut block));
        assert_eq!(block.channel(0), &[1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_mono_clip_fans_out_to_all_channels() {
        let mut source = BufferSource::new(vec![ramp_clip(4)]);
        let mut block = AudioBlock::new(2, 4);
        source.fill_next(&mut block);
        assert_eq!(block.channel(0), block.channel(1));
    }

    #[test]
    fn test_narrow_clip_leaves_extra_channels_silent() {
        let mut source = BufferSource::new(vec![ramp_clip(4), vec![9.0; 4]]);
        let mut block = AudioBlock::new(3, 4);
        source.fill_next(&mut block);
        assert_eq!(block.channel(0), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(block.channel(1), &[9.0, 9.0, 9.0, 9.0]);
        assert!(block.channel(2).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_uneven_rows_use_shortest() {
        let source = BufferSource::new(vec![ramp_clip(10), ramp_clip(7)]);
        assert_eq!(source.len(), 7);
    }

    #[test]
    fn test_reset_rewinds_to_start() {
        let mut source = BufferSource::new(vec![ramp_clip(4)]);
        let mut block = AudioBlock::new(1, 4);
        source.fill_next(&mut block);
        assert_eq!(source.position(), 4);

        source.reset();
        assert_eq!(source.position(), 0);
        assert!(!source.fill_next(&mut block));
        assert_eq!(block.channel(0), &[0.0, 1.0, 2.0, 3.0]);
    }
}

//! Planar audio block exchanged between source, echo pipeline, and output.

/// Multi-channel sample block, one contiguous row per channel.
///
/// Blocks are allocated when a stream is configured and reused across
/// callbacks. `resize` may grow a row (first callback only, when the device
/// delivers more frames than the configured hint); after that the storage is
/// stable and nothing here touches the allocator.
#[derive(Debug, Clone)]
pub struct AudioBlock {
    channels: Vec<Vec<f32>>,
    len: usize,
}

impl AudioBlock {
    /// Zero-filled block with `channel_count` rows of `len` samples.
    pub fn new(channel_count: usize, len: usize) -> Self {
        Self {
            channels: vec![vec![0.0; len]; channel_count.max(1)],
            len,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index][..self.len]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index][..self.len]
    }

    /// Zero every sample.
    pub fn silence(&mut self) {
        for row in &mut self.channels {
            row[..self.len].fill(0.0);
        }
    }

    /// Change the block length, growing rows if needed. Shrinking keeps the
    /// row capacity so a later grow back does not reallocate.
    pub fn resize(&mut self, len: usize) {
        if len == self.len {
            return;
        }
        for row in &mut self.channels {
            if row.len() < len {
                row.resize(len, 0.0);
            }
        }
        self.len = len;
    }
}

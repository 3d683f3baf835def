//! Shared state between the control thread and the device callback.
//!
//! The stream callback is the only code that touches the processor, the
//! source and the scratch block, so they live in [`UnsafeCell`]s instead of
//! behind locks. Control-side mutations travel over a command channel and
//! are applied at the top of a callback, between blocks. Sources that get
//! replaced are shipped back to the control thread over the `retired`
//! channel so the audio thread never frees clip memory.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::block::AudioBlock;
use crate::echo::EchoProcessor;
use crate::lockfree::AtomicFlag;
use crate::source::{PcmSource, SilenceSource};

/// Control-thread requests applied on the audio thread at block boundaries.
pub(crate) enum SourceCommand {
    /// Swap in new material and rewind the play position.
    Replace(Box<dyn PcmSource>),
    /// Rewind the material and clear the echo tail.
    Rewind,
}

pub(crate) struct PlayerCallbackState {
    processor: UnsafeCell<EchoProcessor>,
    source: UnsafeCell<Box<dyn PcmSource>>,
    scratch: UnsafeCell<AudioBlock>,
    commands: Receiver<SourceCommand>,
    retired: Sender<Box<dyn PcmSource>>,
    playing: Arc<AtomicFlag>,
    source_finished: Arc<AtomicFlag>,
    sample_position: Arc<AtomicU64>,
}

// SAFETY: exactly one stream callback drives the cells at a time; cpal
// serializes data callbacks, and the control thread only communicates
// through the channels and atomics.
unsafe impl Send for PlayerCallbackState {}
unsafe impl Sync for PlayerCallbackState {}

impl PlayerCallbackState {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        processor: EchoProcessor,
        channels: usize,
        expected_block_length: usize,
        commands: Receiver<SourceCommand>,
        retired: Sender<Box<dyn PcmSource>>,
        playing: Arc<AtomicFlag>,
        source_finished: Arc<AtomicFlag>,
        sample_position: Arc<AtomicU64>,
    ) -> Self {
        Self {
            processor: UnsafeCell::new(processor),
            source: UnsafeCell::new(Box::new(SilenceSource)),
            scratch: UnsafeCell::new(AudioBlock::new(channels, expected_block_length)),
            commands,
            retired,
            playing,
            source_finished,
            sample_position,
        }
    }

    #[inline]
    #[allow(clippy::mut_from_ref)]
    unsafe fn processor_mut(&self) -> &mut EchoProcessor {
        &mut *self.processor.get()
    }

    #[inline]
    #[allow(clippy::mut_from_ref)]
    unsafe fn source_mut(&self) -> &mut Box<dyn PcmSource> {
        &mut *self.source.get()
    }

    #[inline]
    #[allow(clippy::mut_from_ref)]
    unsafe fn scratch_mut(&self) -> &mut AudioBlock {
        &mut *self.scratch.get()
    }

    /// Most recently rendered block, for the interleaving copy.
    ///
    /// # Safety
    /// Only call from the stream callback that also calls
    /// [`process_audio`], after it has returned for the current buffer.
    #[inline]
    pub(crate) unsafe fn rendered(&self) -> &AudioBlock {
        &*self.scratch.get()
    }
}

/// Render `frames` samples per channel into the scratch block.
///
/// Must only be called from the active stream's data callback; the cell
/// accesses below rely on that exclusivity.
pub(crate) fn process_audio(state: &PlayerCallbackState, frames: usize) {
    while let Ok(command) = state.commands.try_recv() {
        apply_command(state, command);
    }

    // SAFETY: single-callback exclusivity, see module docs.
    let scratch = unsafe { state.scratch_mut() };
    scratch.resize(frames);

    if !state.playing.get() {
        // Paused: emit silence but keep the ring tail and play position
        // frozen for resume.
        scratch.silence();
        return;
    }

    // SAFETY: as above.
    let more = unsafe { state.source_mut() }.fill_next(scratch);
    if !more {
        state.source_finished.set(true);
    }
    // SAFETY: as above.
    unsafe { state.processor_mut() }.process(scratch);
    state.sample_position.fetch_add(frames as u64, Ordering::Relaxed);
}

fn apply_command(state: &PlayerCallbackState, command: SourceCommand) {
    // SAFETY: called from process_audio only.
    let source = unsafe { state.source_mut() };
    match command {
        SourceCommand::Replace(new_source) => {
            let old = std::mem::replace(source, new_source);
            // Send failure means the control side hung up; the box drops
            // here as a last resort.
            let _ = state.retired.send(old);
            state.source_finished.set(false);
            state.sample_position.store(0, Ordering::Relaxed);
        }
        SourceCommand::Rewind => {
            source.reset();
            // SAFETY: as above.
            unsafe { state.processor_mut() }.reset();
            state.source_finished.set(false);
            state.sample_position.store(0, Ordering::Relaxed);
        }
    }
}

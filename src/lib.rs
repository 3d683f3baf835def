//! # Echoplay - Interactive Audio Player with Real-Time Echo
//!
//! Audio player built around a feedback delay line.
//!
//! ## Architecture
//!
//! Echoplay is an umbrella crate over:
//! - **echoplay-core** - Delay line, echo pipeline, playback sources and the
//!   CPAL-backed player system
//!
//! ## Quick Start
//!
//! ```ignore
//! use echoplay::prelude::*;
//!
//! // Create the player (opens the default output device)
//! let engine = EchoEngine::builder()
//!     .delay_time_ms(350.0)
//!     .feedback_gain(0.6)
//!     .build()?;
//!
//! // Load material and play
//! engine.set_source(BufferSource::new(vec![samples]));
//! engine.play();
//!
//! // Live parameter changes land on block boundaries
//! engine.set_delay_time_ms(500.0).set_master_gain(0.8);
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Device-backed playback
//! - `output` - CPAL audio I/O and the player engine

/// Re-export of echoplay-core for direct access
pub use echoplay_core as core;

// Core types
pub use echoplay_core::{
    // Lock-free primitives
    AtomicFlag,
    AtomicFloat,

    // Block pipeline
    AudioBlock,
    BufferSource,
    DelayLine,
    EchoProcessor,
    EchoProcessorBuilder,

    // Error
    Error,
    GainStage,
    PcmSource,
    PlayerConfig,
    Result,
    SilenceSource,
    MAX_CHANNELS,
};

#[cfg(feature = "output")]
pub use echoplay_core::{PlayerSystem, PlayerSystemBuilder};

#[cfg(feature = "output")]
mod builder;
#[cfg(feature = "output")]
mod engine;

#[cfg(feature = "output")]
pub use builder::EchoEngineBuilder;
#[cfg(feature = "output")]
pub use engine::EchoEngine;

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    #[cfg(feature = "output")]
    pub use crate::{EchoEngine, EchoEngineBuilder};

    // Essential types
    pub use crate::core::{AudioBlock, BufferSource, PcmSource, PlayerConfig, SilenceSource};
}

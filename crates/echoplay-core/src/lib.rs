//! Real-time audio player core with a feedback echo pipeline.
//!
//! # Primary API
//!
//! - [`PlayerSystem`] / [`PlayerSystemBuilder`]: Main entry point
//! - [`EchoProcessor`]: Delay/echo pipeline, also usable standalone for
//!   offline rendering
//! - [`PcmSource`] / [`BufferSource`]: Playback material
//! - [`PlayerConfig`]: Startup configuration
//!
//! # Feature-gated APIs
//!
//! - `"output"`: CPAL audio I/O and the device-backed player (enabled by
//!   default)
//!
//! # Example
//!
//! ```ignore
//! use echoplay_core::{BufferSource, PlayerSystem};
//!
//! let system = PlayerSystem::builder().build()?;
//! system.set_source(BufferSource::new(vec![samples]));
//! system.set_delay_time_ms(350.0);
//! system.set_feedback_gain(0.6);
//! system.play();
//! ```

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::PlayerConfig;

mod block;
pub use block::AudioBlock;

mod delay_line;
pub use delay_line::DelayLine;

mod gain;
pub use gain::GainStage;

mod echo;
pub use echo::{EchoProcessor, EchoProcessorBuilder, MAX_CHANNELS};

mod source;
pub use source::{BufferSource, PcmSource, SilenceSource};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};

#[cfg(feature = "output")]
pub(crate) mod callback;

#[cfg(feature = "output")]
pub(crate) mod output;

#[cfg(feature = "output")]
mod system;
#[cfg(feature = "output")]
pub use system::{PlayerSystem, PlayerSystemBuilder};

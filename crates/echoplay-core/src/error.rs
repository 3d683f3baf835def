//! Error types for echoplay-core.

use thiserror::Error;

/// Error type for echoplay-core operations.
///
/// Nothing on the audio thread returns one of these; real-time misuse is
/// handled by clamping at the control boundary. Errors surface only from
/// configuration and device setup.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[cfg(feature = "output")]
    #[error("No usable stream config for the output device")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "output")]
    #[error("Could not build the output stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "output")]
    #[error("Could not start the output stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[cfg(feature = "output")]
    #[error("Could not enumerate output devices")]
    DeviceEnumeration(#[from] cpal::DevicesError),

    #[cfg(feature = "output")]
    #[error("Could not read the device name")]
    DeviceName(#[from] cpal::DeviceNameError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types shared across the bridge.
//!
//! Reads never fail: missing pads, buttons and axes all degrade to a default
//! reading. The variants here cover the few places where something the caller
//! handed us, or something the platform did, cannot be turned into a value.

use crate::selector::DetailField;
use thiserror::Error;

/// Errors raised by [`InputNormalizer`](crate::normalizer::InputNormalizer) queries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizerError {
    /// The device identifier does not carry the `vendor:`/`product:` marker
    /// needed to answer a [`DetailField::Vendor`] or [`DetailField::Product`] query.
    #[error("Malformed device identifier for {field}: {id:?}")]
    MalformedIdentifier { field: DetailField, id: String },
}

/// Errors from the haptics collaborator.
///
/// These never reach the caller of `rumble`; they are logged and dropped.
#[derive(Debug, Error)]
pub enum HapticsError {
    #[error("No gamepad in slot {0}")]
    UnknownSlot(usize),

    #[error("Force feedback not supported by gamepad in slot {0}")]
    Unsupported(usize),

    #[error("Failed to build effect: {0}")]
    EffectBuild(String),

    #[error("Failed to play effect: {0}")]
    Playback(String),
}

/// Errors from device backends.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to initialize backend: {0}")]
    InitializationError(String),
}

/// Errors from the text command surface.
#[derive(Debug, Error, PartialEq)]
pub enum SurfaceError {
    #[error("Empty request")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument <{argument}> for {command}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Too many arguments for {0}")]
    TooManyArguments(&'static str),

    #[error("Argument <{argument}> for {command} is not a number: {value:?}")]
    NotANumber {
        command: &'static str,
        argument: &'static str,
        value: String,
    },
}

/// Errors from loading or storing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

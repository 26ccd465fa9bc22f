//! Error handling for the ambient mixer
//!
//! Parameter setters never fail (out-of-range values are clamped), so the
//! errors here come from the platform audio context, the settings store and
//! snapshot parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mixer operations
pub type Result<T> = std::result::Result<T, MixerError>;

/// Main error type for mixer operations
#[derive(Error, Debug)]
pub enum MixerError {
    // Platform Audio Errors
    #[error("Audio context unavailable: {reason}")]
    AudioContextUnavailable { reason: String },

    #[error("Failed to resume audio context: {reason}")]
    ResumeFailed { reason: String },

    // Snapshot Errors
    #[error("Corrupt mixer snapshot under key '{key}': {source}")]
    CorruptSnapshot {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Settings Store Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings store unavailable: {reason}")]
    SettingsUnavailable { reason: String },

    // Control Surface Errors
    #[error("Unknown channel: {name}")]
    UnknownChannel { name: String },

    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidParameterValue { name: String, value: String },

    // Configuration Errors
    #[error("Invalid configuration: {name} {reason}")]
    InvalidConfig { name: String, reason: String },

    // Export Errors
    #[error("WAV export failed: {0}")]
    WavExport(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MixerError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            MixerError::AudioContextUnavailable { .. } => "AUDIO_CONTEXT_UNAVAILABLE",
            MixerError::ResumeFailed { .. } => "RESUME_FAILED",
            MixerError::CorruptSnapshot { .. } => "CORRUPT_SNAPSHOT",
            MixerError::Serialization(_) => "SERIALIZATION_ERROR",
            MixerError::FileReadError { .. } => "FILE_READ_ERROR",
            MixerError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            MixerError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            MixerError::SettingsUnavailable { .. } => "SETTINGS_UNAVAILABLE",
            MixerError::UnknownChannel { .. } => "UNKNOWN_CHANNEL",
            MixerError::UnknownParameter { .. } => "UNKNOWN_PARAMETER",
            MixerError::InvalidParameterValue { .. } => "INVALID_PARAMETER_VALUE",
            MixerError::InvalidConfig { .. } => "INVALID_CONFIG",
            MixerError::WavExport(_) => "WAV_EXPORT_ERROR",
            MixerError::Io(_) => "IO_ERROR",
        }
    }

    /// Returns a user-facing recovery suggestion, if one applies.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            MixerError::AudioContextUnavailable { .. } => {
                Some("Check that an audio output device is available.")
            }
            MixerError::ResumeFailed { .. } => {
                Some("Audio playback must be started from a user action. Press play again.")
            }
            MixerError::CorruptSnapshot { .. } => {
                Some("The saved mix could not be read. Save the current mix to replace it.")
            }
            MixerError::UnknownChannel { .. } => {
                Some("Valid channels: rain, wind, fire, waves, cafe, master.")
            }
            MixerError::UnknownParameter { .. } => Some("Valid parameters: gain, pan, filter."),
            MixerError::InvalidConfig { .. } => {
                Some("Check the engine configuration file and command-line overrides.")
            }
            MixerError::FileWriteError { .. } | MixerError::DirectoryCreateError { .. } => {
                Some("Check that the settings location is writable.")
            }
            _ => None,
        }
    }
}

//! Core error types for presenter-timer-core.
//!
//! Failures are grouped by the collaborator that produced them so the shell
//! can decide which ones become status messages and which ones abort a
//! command. Nothing in the countdown or flash path returns these errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for presenter-timer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad duration components or command arguments.
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Settings store errors
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Message list store errors
    #[error("Message store error: {0}")]
    Messages(#[from] MessageError),

    /// Background image validation errors
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Shell configuration parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CoreError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Settings-store errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read or parse the settings file
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to write the settings file
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to copy the settings file to its backup
    #[error("Failed to back up settings to {path}: {message}")]
    BackupFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Value could not be parsed for the key's type
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Message-store errors.
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Message text must not be blank")]
    Blank,

    #[error("Index {index} out of bounds for message list (length: {len})")]
    OutOfBounds { index: usize, len: usize },

    #[error("Failed to save messages to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Image validation errors.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported image type for {path} (expected jpg, jpeg, png or bmp)")]
    UnsupportedType { path: PathBuf },

    #[error("Image size exceeds limit ({limit_mb} MB): {path} is {size} bytes")]
    TooLarge {
        path: PathBuf,
        size: u64,
        limit_mb: u64,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

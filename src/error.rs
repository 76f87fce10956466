//! Typed error taxonomy for the transcription service.
//!
//! Per-attachment pipeline failures are recoverable and contained at the
//! dispatcher boundary; configuration errors are fatal at startup.

use thiserror::Error;

/// Fatal startup errors. The process exits before connecting anywhere.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value: {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Chat transport errors from the platform bridge.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Failed to connect to chat bridge: {0}")]
    Connect(String),

    #[error("Failed to publish message: {0}")]
    Publish(String),

    #[error("Bridge request failed: {0}")]
    Request(String),
}

/// Identity lookup errors. Recoverable: the formatter falls back to a
/// generic author label instead of propagating.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Failed to fetch profile for user {user_id}: {reason}")]
    Fetch { user_id: String, reason: String },

    #[error("Malformed profile payload for user {0}")]
    Malformed(String),
}

/// Per-attachment pipeline errors. All recoverable: the dispatcher logs
/// the failure and moves on to the next attachment.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to fetch attachment: {0}")]
    Fetch(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Failed to upload audio: {0}")]
    Upload(String),

    #[error("Speech recognition failed: {0}")]
    Recognition(String),

    #[error("No speech recognized")]
    NoSpeech,

    #[error("Failed to send reply: {0}")]
    Send(#[from] ChatError),
}

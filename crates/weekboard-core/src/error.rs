//! Core error types for weekboard-core.
//!
//! This module defines the error hierarchy using thiserror. Rendering itself
//! is total; errors only arise while turning the static configuration into a
//! schedule or when a caller asks for something the schedule cannot answer.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for weekboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A time-of-day string matched none of the accepted formats
    #[error("Invalid time of day '{input}': use HH:MM (24h) or H:MM AM/PM")]
    InvalidTimeOfDay { input: String },

    /// A timestamp string could not be parsed
    #[error("Invalid timestamp '{input}': use YYYY-MM-DD HH:MM")]
    InvalidTimestamp { input: String },

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

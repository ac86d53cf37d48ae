//! Core error types for tabpager-core
//!
//! This module provides error types used throughout the tabpager container.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use toml::de::Error as ConfigSyntaxError;

/// Core errors that can occur in the tabpager container.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A selection or lookup referenced an index outside the installed items.
    ///
    /// Public selection entry points treat this as a silent no-op; the
    /// variant exists so internal `try_*` paths can report why nothing
    /// happened.
    #[error("index {index} out of range for {len} items")]
    InvalidIndex { index: usize, len: usize },

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("invalid configuration file at {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: ConfigSyntaxError,
    },

    /// Configuration could not be serialized back to TOML.
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Event system error.
    ///
    /// This occurs when the message bus cannot deliver a message,
    /// typically because nobody is subscribed.
    #[error("event error: {0}")]
    EventError(String),

    /// Underlying IO error bubbled up from filesystem operations.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

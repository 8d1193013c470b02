//! # Playback Error Types

use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The queue holds no songs.
    #[error("Queue is empty")]
    EmptyQueue,

    /// A requested queue position does not exist.
    #[error("Index {index} out of range for queue of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The host media element refused an operation.
    #[error("Media element error: {0}")]
    Element(String),
}

pub type Result<T> = std::result::Result<T, PlaybackError>;

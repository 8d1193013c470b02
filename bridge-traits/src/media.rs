//! Media Store Abstraction
//!
//! A media store accepts an audio file and hands back a durable public URL,
//! an identifier that can later be used to delete the file, and the duration
//! of the track when the host could measure it.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Audio file to be uploaded.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    /// Original file name as supplied by the client
    pub file_name: String,
    /// MIME type reported by the client, if any
    pub content_type: Option<String>,
    /// Raw file contents
    pub data: Bytes,
}

impl MediaUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data,
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMedia {
    /// Durable, publicly reachable URL of the stored file
    pub url: String,
    /// Store-specific identifier used for deletion
    pub public_id: String,
    /// Track length in seconds, when the store reports it
    pub duration_secs: Option<f64>,
}

/// External media store.
///
/// Each operation performs a single round trip; callers decide whether a
/// failure is worth surfacing or only logging.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload an audio file.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the file, the network fails,
    /// or the store response cannot be understood.
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia>;

    /// Delete a previously stored file by its public identifier.
    async fn destroy(&self, public_id: &str) -> Result<()>;

    /// Verify credentials and reachability.
    async fn ping(&self) -> Result<()>;
}

//! Error types for the Cloudinary provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Cloudinary provider errors
#[derive(Error, Debug)]
pub enum CloudinaryError {
    /// API request returned a non-success status
    #[error("Cloudinary API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Transport or bridge failure
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Result type for Cloudinary operations
pub type Result<T> = std::result::Result<T, CloudinaryError>;

impl From<CloudinaryError> for BridgeError {
    fn from(error: CloudinaryError) -> Self {
        match error {
            CloudinaryError::Api { status, message } => BridgeError::OperationFailed(format!(
                "Media store API error (status {}): {}",
                status, message
            )),
            CloudinaryError::Parse(msg) => {
                BridgeError::OperationFailed(format!("Media store parse error: {}", msg))
            }
            CloudinaryError::Bridge(e) => e,
        }
    }
}

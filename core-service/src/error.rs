use axum::http::StatusCode;
use bridge_traits::error::BridgeError;
use core_library::LibraryError;
use thiserror::Error;

/// Client-facing message for a rejected upload.
pub const MISSING_FIELDS: &str = "Missing required fields";
/// Client-facing message when the media store refused the file.
pub const MEDIA_STORE_FAILED: &str = "Failed to upload to media store";
/// Client-facing message for any other upload failure.
pub const UPLOAD_FAILED: &str = "Failed to upload song";
/// Client-facing message for a failed listing.
pub const FETCH_FAILED: &str = "Failed to fetch songs";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Media store error: {0}")]
    MediaStore(#[source] BridgeError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Malformed multipart body: {0}")]
    Multipart(String),
}

impl ServiceError {
    /// HTTP status the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::MediaStore(_) | ServiceError::Library(_) | ServiceError::Multipart(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to clients of the upload endpoint.
    pub fn public_message(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => MISSING_FIELDS,
            ServiceError::MediaStore(_) => MEDIA_STORE_FAILED,
            ServiceError::Library(_) | ServiceError::Multipart(_) => UPLOAD_FAILED,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

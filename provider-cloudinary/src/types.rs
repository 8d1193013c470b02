//! Cloudinary API response types

use serde::Deserialize;

/// Response of `POST /{resource_type}/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    /// Seconds, present for audio and video
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Response of `POST /{resource_type}/destroy`.
#[derive(Debug, Clone, Deserialize)]
pub struct DestroyResponse {
    /// `"ok"` or `"not found"`
    pub result: String,
}

/// Response of `GET /ping`.
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    pub status: String,
}

/// Error envelope returned with 4xx/5xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

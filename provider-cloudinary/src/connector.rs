//! Cloudinary API connector implementation
//!
//! Implements the `MediaStore` trait over the Cloudinary upload API.

use async_trait::async_trait;
use base64::Engine;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartForm};
use bridge_traits::media::{MediaStore, MediaUpload, StoredMedia};
use bridge_traits::time::{Clock, SystemClock};
use core_runtime::config::MediaStoreConfig;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::CloudinaryError;
use crate::types::{DestroyResponse, ErrorResponse, PingResponse, UploadResponse};

/// Cloudinary API base URL
const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Audio is filed under the `video` resource type by Cloudinary
const AUDIO_RESOURCE_TYPE: &str = "video";

/// Upload timeout; audio files can be large
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Cloudinary media store
///
/// # Example
///
/// ```ignore
/// use provider_cloudinary::CloudinaryMediaStore;
/// use bridge_traits::media::{MediaStore, MediaUpload};
///
/// let store = CloudinaryMediaStore::new(http_client, config.media_store.clone());
/// let stored = store.upload(MediaUpload::new("song.mp3", None, bytes)).await?;
/// ```
pub struct CloudinaryMediaStore {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Credentials and upload folder
    config: MediaStoreConfig,

    /// Source of signature timestamps
    clock: Arc<dyn Clock>,

    api_base: String,
}

impl CloudinaryMediaStore {
    /// Create a new Cloudinary media store
    pub fn new(http_client: Arc<dyn HttpClient>, config: MediaStoreConfig) -> Self {
        Self {
            http_client,
            config,
            clock: Arc::new(SystemClock),
            api_base: API_BASE.to_string(),
        }
    }

    /// Replace the clock used for request timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Point the store at a different API host
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.api_base, self.config.cloud_name, path)
    }

    /// Sign a parameter set.
    ///
    /// Parameters are sorted by name, joined as `k=v&k=v`, suffixed with the
    /// API secret and hashed with SHA-256.
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<_> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Build a signed multipart form from the given parameters
    fn signed_form(&self, params: Vec<(&str, String)>) -> MultipartForm {
        let signature = self.sign(&params);

        params
            .into_iter()
            .fold(MultipartForm::new(), |form, (k, v)| form.text(k, v))
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.config.api_key, self.config.api_secret);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }

    /// Execute a request once and decode the JSON body of a 2xx response
    async fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let response = self.http_client.execute(request).await?;
        Self::decode(response).map_err(Into::into)
    }

    fn decode<T: DeserializeOwned>(response: HttpResponse) -> std::result::Result<T, CloudinaryError> {
        if !response.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&response.body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).into_owned());

            warn!(status = response.status, message = %message, "Cloudinary request failed");
            return Err(CloudinaryError::Api {
                status: response.status,
                message,
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| CloudinaryError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    #[instrument(skip(self, upload), fields(file = %upload.file_name, bytes = upload.size()))]
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia> {
        let timestamp = self.clock.unix_timestamp().to_string();
        let params = vec![
            ("folder", self.config.upload_folder.clone()),
            ("timestamp", timestamp),
        ];

        let form = self.signed_form(params).file(
            "file",
            upload.file_name.clone(),
            upload.content_type.clone(),
            upload.data,
        );

        let request = HttpRequest::new(HttpMethod::Post, self.endpoint("auto/upload"))
            .header("Accept", "application/json")
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT);

        let response: UploadResponse = self.send(request).await?;

        info!(
            public_id = %response.public_id,
            resource_type = ?response.resource_type,
            duration = ?response.duration,
            "Uploaded file to Cloudinary"
        );

        Ok(StoredMedia {
            url: response.secure_url,
            public_id: response.public_id,
            duration_secs: response.duration,
        })
    }

    #[instrument(skip(self))]
    async fn destroy(&self, public_id: &str) -> Result<()> {
        let params = vec![
            ("public_id", public_id.to_string()),
            ("timestamp", self.clock.unix_timestamp().to_string()),
        ];

        let request = HttpRequest::new(
            HttpMethod::Post,
            self.endpoint(&format!("{}/destroy", AUDIO_RESOURCE_TYPE)),
        )
        .header("Accept", "application/json")
        .multipart(self.signed_form(params));

        let response: DestroyResponse = self.send(request).await?;
        debug!(result = %response.result, "Destroy finished");

        if response.result == "ok" || response.result == "not found" {
            Ok(())
        } else {
            Err(CloudinaryError::Api {
                status: 200,
                message: format!("Unexpected destroy result '{}'", response.result),
            }
            .into())
        }
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Result<()> {
        let request = HttpRequest::new(HttpMethod::Get, self.endpoint("ping"))
            .header("Authorization", self.basic_auth_header())
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(10));

        let response: PingResponse = self.send(request).await?;
        debug!(status = %response.status, "Cloudinary ping answered");
        Ok(())
    }
}

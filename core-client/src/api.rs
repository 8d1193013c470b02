//! Client for the songs API.
//!
//! Speaks to `GET /api/songs` and `POST /api/songs` through an injected
//! [`HttpClient`], so the same code runs against a real server or a test
//! double.

use std::sync::Arc;

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartForm};
use core_library::Song;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{ClientError, Result};
use crate::upload::UploadSubmission;

/// Shown when a listing fails without a server-provided message.
pub const FETCH_FAILED: &str = "Failed to fetch songs";
/// Shown when an upload fails without a server-provided message.
pub const UPLOAD_FAILED: &str = "Failed to upload song";
/// Shown when an upload succeeds but the body carries no song.
pub const INVALID_RESPONSE: &str = "Invalid response from server";

const SONGS_PATH: &str = "/api/songs";

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    song: Option<Song>,
}

pub struct SongsApiClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl SongsApiClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    fn songs_url(&self) -> String {
        format!("{}{}", self.base_url, SONGS_PATH)
    }

    /// Fetch the whole library, oldest first.
    #[instrument(skip(self))]
    pub async fn list_songs(&self) -> Result<Vec<Song>> {
        let request = HttpRequest::new(HttpMethod::Get, self.songs_url());
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(api_error(&response, FETCH_FAILED));
        }

        let songs: Vec<Song> = response.json().map_err(|e| {
            warn!(error = %e, "Song listing did not parse");
            ClientError::InvalidResponse(INVALID_RESPONSE.to_string())
        })?;
        debug!(count = songs.len(), "Fetched songs");
        Ok(songs)
    }

    /// Send one upload form to the server.
    #[instrument(skip(self, submission), fields(title = %submission.fields.title))]
    pub async fn upload_song(&self, submission: &UploadSubmission) -> Result<Song> {
        let fields = &submission.fields;
        let file = &submission.file;
        let form = MultipartForm::new()
            .text("title", fields.title.as_str())
            .text("artist", fields.artist.as_str())
            .text("album", fields.album.as_str())
            .text("genre", fields.genre.as_str())
            .file(
                "audioFile",
                file.name.as_str(),
                file.content_type.clone(),
                file.data.clone(),
            );

        let request = HttpRequest::new(HttpMethod::Post, self.songs_url()).multipart(form);
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(api_error(&response, UPLOAD_FAILED));
        }

        response
            .json::<UploadEnvelope>()
            .ok()
            .and_then(|envelope| envelope.song)
            .ok_or_else(|| ClientError::InvalidResponse(INVALID_RESPONSE.to_string()))
    }
}

/// Error from a non-2xx response, preferring the server's `error` text.
fn api_error(response: &HttpResponse, fallback: &str) -> ClientError {
    let message = response
        .json::<ErrorEnvelope>()
        .ok()
        .and_then(|envelope| envelope.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    warn!(status = response.status, message = %message, "Songs API request failed");
    ClientError::Api {
        status: response.status,
        message,
    }
}

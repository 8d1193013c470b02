//! Domain models for the song library
//!
//! Rows map one-to-one onto the `songs` table. Timestamps are Unix seconds.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored song.
///
/// Serialized in camelCase because that is the shape the songs API returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Store-assigned identifier, increasing with insertion
    pub id: i64,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// Length in seconds as text, e.g. `"180"` or `"212.48"`
    pub duration: Option<String>,
    /// Public URL of the audio file in the media store
    pub media_url: String,
    /// Media store identifier, used for deletion
    pub media_public_id: String,
    pub cover_art_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Song {
    /// Parse the stored duration.
    ///
    /// Returns `None` when absent, unparseable, negative or non-finite.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration
            .as_deref()
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
    }
}

/// Insert payload for a song. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewSong {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<String>,
    pub media_url: String,
    pub media_public_id: String,
    pub cover_art_url: Option<String>,
}

impl NewSong {
    /// Validate song data
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Song title cannot be empty".to_string());
        }

        if !is_absolute_http_url(&self.media_url) {
            return Err(format!(
                "Media URL must be an absolute http(s) URL, got '{}'",
                self.media_url
            ));
        }

        if self.media_public_id.trim().is_empty() {
            return Err("Media public id cannot be empty".to_string());
        }

        Ok(())
    }
}

fn is_absolute_http_url(url: &str) -> bool {
    ["https://", "http://"]
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
        .map_or(false, |rest| !rest.is_empty())
}

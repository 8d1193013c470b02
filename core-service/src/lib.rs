//! Song library service and its HTTP surface.
//!
//! [`LibraryService`] is the only place where the media store and the song
//! repository meet. It accepts an upload, pushes the audio to the media store,
//! records the resulting song and lists the library. [`api::router`] exposes
//! both operations as `POST /api/songs` and `GET /api/songs`.

pub mod api;
pub mod error;

pub use error::{Result, ServiceError};

use std::sync::Arc;

use bridge_traits::media::{MediaStore, MediaUpload};
use bytes::Bytes;
use core_library::{NewSong, Song, SongRepository};
use core_runtime::logging::strip_path;
use tracing::{error, info, instrument, warn};

/// Audio file attached to an upload.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Decoded upload request.
///
/// Every field is optional at this level; required-ness is checked by
/// [`LibraryService::upload_song`].
#[derive(Debug, Clone, Default)]
pub struct UploadSongRequest {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub audio_file: Option<AudioPayload>,
}

/// Blank optional text is stored as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Upload and listing operations over the song library.
#[derive(Clone)]
pub struct LibraryService {
    media_store: Arc<dyn MediaStore>,
    songs: Arc<dyn SongRepository>,
}

impl LibraryService {
    pub fn new(media_store: Arc<dyn MediaStore>, songs: Arc<dyn SongRepository>) -> Self {
        Self { media_store, songs }
    }

    /// Store an uploaded song.
    ///
    /// The title and a non-empty audio file are required; nothing reaches the
    /// media store otherwise. The file is uploaded exactly once and the song
    /// row is inserted exactly once. If the insert fails after a successful
    /// upload, the uploaded file is deleted on a best-effort basis and the
    /// insert error is returned.
    #[instrument(skip(self, request))]
    pub async fn upload_song(&self, request: UploadSongRequest) -> Result<Song> {
        let title = request.title.filter(|t| !t.trim().is_empty());
        let audio = request.audio_file.filter(|f| !f.data.is_empty());

        let (title, audio) = match (title, audio) {
            (Some(title), Some(audio)) => (title, audio),
            (title, audio) => {
                warn!(
                    has_title = title.is_some(),
                    has_file = audio.is_some(),
                    "Rejected upload with missing fields"
                );
                return Err(ServiceError::Validation(
                    error::MISSING_FIELDS.to_string(),
                ));
            }
        };

        info!(
            file = %strip_path(&audio.file_name),
            size = audio.data.len(),
            content_type = ?audio.content_type,
            "Received audio upload"
        );

        let stored = self
            .media_store
            .upload(MediaUpload::new(audio.file_name, audio.content_type, audio.data))
            .await
            .map_err(|e| {
                error!(error = %e, "Media store upload failed");
                ServiceError::MediaStore(e)
            })?;

        info!(public_id = %stored.public_id, "Audio stored in media store");

        let new_song = NewSong {
            title,
            artist: non_blank(request.artist),
            album: non_blank(request.album),
            genre: non_blank(request.genre),
            duration: stored
                .duration_secs
                .filter(|d| *d > 0.0)
                .map(|d| d.to_string()),
            media_url: stored.url,
            media_public_id: stored.public_id,
            cover_art_url: None,
        };

        match self.songs.insert(&new_song).await {
            Ok(song) => {
                info!(song_id = song.id, title = %song.title, "Song saved");
                Ok(song)
            }
            Err(e) => {
                error!(error = %e, "Failed to save song; removing uploaded media");
                if let Err(destroy_err) = self.media_store.destroy(&new_song.media_public_id).await
                {
                    warn!(
                        error = %destroy_err,
                        public_id = %new_song.media_public_id,
                        "Could not remove orphaned media"
                    );
                }
                Err(ServiceError::Library(e))
            }
        }
    }

    /// Every song, oldest first.
    #[instrument(skip(self))]
    pub async fn list_songs(&self) -> Result<Vec<Song>> {
        let songs = self.songs.list_by_creation().await.map_err(|e| {
            error!(error = %e, "Failed to list songs");
            ServiceError::Library(e)
        })?;

        info!(count = songs.len(), "Listed songs");
        Ok(songs)
    }
}

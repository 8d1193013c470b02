//! Library listing state.

use core_library::Song;
use core_playback::format_time;
use tracing::warn;

use crate::api::SongsApiClient;

pub const UNKNOWN: &str = "Unknown";
pub const NO_DURATION: &str = "--:--";

/// One table row as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRow {
    /// 1-based position
    pub number: usize,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: String,
}

impl LibraryRow {
    fn from_song(index: usize, song: &Song) -> Self {
        Self {
            number: index + 1,
            title: song.title.clone(),
            artist: or_unknown(song.artist.as_deref()),
            album: or_unknown(song.album.as_deref()),
            duration: song
                .duration_secs()
                .map(format_time)
                .unwrap_or_else(|| NO_DURATION.to_string()),
        }
    }
}

fn or_unknown(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// What the listing area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryStatus {
    Loading,
    /// Fetch failed; a retry is offered
    Error(String),
    Empty,
    Ready,
}

#[derive(Debug)]
pub struct LibraryView {
    songs: Vec<Song>,
    loading: bool,
    error: Option<String>,
}

impl Default for LibraryView {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryView {
    /// A view that has not fetched yet reads as loading.
    pub fn new() -> Self {
        Self {
            songs: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Fetch the library. Returns whether the fetch succeeded.
    pub async fn load(&mut self, api: &SongsApiClient) -> bool {
        self.loading = true;
        self.error = None;

        let ok = match api.list_songs().await {
            Ok(songs) => {
                self.songs = songs;
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to load library");
                self.error = Some(e.message());
                false
            }
        };

        self.loading = false;
        ok
    }

    /// Fetch again after a failure.
    pub async fn retry(&mut self, api: &SongsApiClient) -> bool {
        self.load(api).await
    }

    pub fn song_added(&mut self, song: Song) {
        self.songs.push(song);
    }

    pub fn rows(&self) -> Vec<LibraryRow> {
        self.songs
            .iter()
            .enumerate()
            .map(|(i, song)| LibraryRow::from_song(i, song))
            .collect()
    }

    pub fn status(&self) -> LibraryStatus {
        if self.loading {
            LibraryStatus::Loading
        } else if let Some(message) = &self.error {
            LibraryStatus::Error(message.clone())
        } else if self.songs.is_empty() {
            LibraryStatus::Empty
        } else {
            LibraryStatus::Ready
        }
    }
}

//! # Player
//!
//! Queue-driven playback state on top of a [`MediaElement`].
//!
//! ## Overview
//!
//! The player owns the queue, the selected position and the wanted
//! [`PlaybackState`]. After every change of position or state it re-applies
//! itself to the element: the source is rebound only when the selected
//! song's URL differs from the bound one, then the element is told to play
//! or pause to match.
//!
//! Time and duration are mirrored from the element through
//! [`Player::on_time_update`] and [`Player::on_loaded_metadata`], which the
//! host calls from the element's own events.

use core_library::Song;
use tracing::{debug, instrument};

use crate::error::{PlaybackError, Result};
use crate::time_format::{format_time, next_index, previous_index};
use crate::traits::{MediaElement, PlaybackState};

/// Shown when nothing is selected.
pub const NO_SONG_SELECTED: &str = "No song selected";
/// Shown when the selected song has no artist.
pub const UNKNOWN_ARTIST: &str = "Unknown artist";

pub struct Player<E: MediaElement> {
    element: E,
    queue: Vec<Song>,
    current_index: usize,
    state: PlaybackState,
    current_time: f64,
    duration: f64,
    bound_url: Option<String>,
}

impl<E: MediaElement> Player<E> {
    pub fn new(element: E) -> Self {
        Self {
            element,
            queue: Vec::new(),
            current_index: 0,
            state: PlaybackState::Paused,
            current_time: 0.0,
            duration: f64::NAN,
            bound_url: None,
        }
    }

    pub fn queue(&self) -> &[Song] {
        &self.queue
    }

    /// Selected position, `None` while the queue is empty.
    pub fn current_index(&self) -> Option<usize> {
        (!self.queue.is_empty()).then_some(self.current_index)
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.queue.get(self.current_index)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    /// Replace the queue.
    ///
    /// The selected position survives when it is still inside the new queue
    /// and falls back to 0 otherwise.
    pub async fn set_queue(&mut self, songs: Vec<Song>) -> Result<()> {
        self.queue = songs;
        if self.current_index >= self.queue.len() {
            self.current_index = 0;
        }
        debug!(len = self.queue.len(), index = self.current_index, "Queue replaced");
        self.apply().await
    }

    #[instrument(skip(self))]
    pub async fn toggle_play_pause(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }
        self.state = self.state.toggled();
        self.apply().await
    }

    pub async fn next(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }
        self.current_index = next_index(self.current_index, self.queue.len());
        self.apply().await
    }

    pub async fn previous(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }
        self.current_index = previous_index(self.current_index, self.queue.len());
        self.apply().await
    }

    /// Jump to `index`.
    pub async fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.queue.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.queue.len(),
            });
        }
        self.current_index = index;
        self.apply().await
    }

    /// The element finished the current song.
    pub async fn on_ended(&mut self) -> Result<()> {
        self.next().await
    }

    pub fn seek(&mut self, secs: f64) {
        self.current_time = secs;
        self.element.set_current_time(secs);
    }

    /// The element reports its clock; the duration may have been learned late.
    pub fn on_time_update(&mut self) {
        self.current_time = self.element.current_time();
        self.duration = self.element.duration();
    }

    pub fn on_loaded_metadata(&mut self) {
        self.duration = self.element.duration();
    }

    pub fn now_playing_title(&self) -> &str {
        self.current_song()
            .map(|s| s.title.as_str())
            .unwrap_or(NO_SONG_SELECTED)
    }

    pub fn now_playing_artist(&self) -> &str {
        self.current_song()
            .and_then(|s| s.artist.as_deref())
            .unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn elapsed_display(&self) -> String {
        format_time(self.current_time)
    }

    pub fn duration_display(&self) -> String {
        format_time(self.duration)
    }

    async fn apply(&mut self) -> Result<()> {
        let Some(song) = self.queue.get(self.current_index) else {
            return Ok(());
        };

        if self.bound_url.as_deref() != Some(song.media_url.as_str()) {
            let url = song.media_url.clone();
            debug!(song_id = song.id, url = %url, "Binding source");
            self.element.set_source(&url).await?;
            self.bound_url = Some(url);
            self.current_time = 0.0;
            self.duration = f64::NAN;
        }

        match self.state {
            PlaybackState::Playing => self.element.play().await,
            PlaybackState::Paused => self.element.pause().await,
        }
    }
}

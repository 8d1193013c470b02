//! # Media Element Abstraction
//!
//! The player never decodes audio itself. It drives a host media element
//! (an HTML `<audio>` element in the browser, or any stand-in that behaves
//! like one) through [`MediaElement`] and mirrors its clock.

use async_trait::async_trait;

use crate::error::Result;

/// Host media element the player drives.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Bind a new source URL. Playback position restarts at zero.
    async fn set_source(&mut self, url: &str) -> Result<()>;

    /// Start or resume playback of the bound source.
    async fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position.
    async fn pause(&mut self) -> Result<()>;

    /// Current position in seconds.
    fn current_time(&self) -> f64;

    /// Length of the bound source in seconds; `NaN` until metadata is loaded.
    fn duration(&self) -> f64;

    /// Move the position. The element clamps out-of-range values.
    fn set_current_time(&mut self, secs: f64);
}

/// Whether the player wants the element running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn toggled(self) -> Self {
        match self {
            PlaybackState::Paused => PlaybackState::Playing,
            PlaybackState::Playing => PlaybackState::Paused,
        }
    }
}

//! # Playback Module
//!
//! Queue navigation and transport state for the song library.
//!
//! ## Overview
//!
//! This module handles:
//! - Driving a host media element through [`MediaElement`]
//! - Play/pause, next/previous with wrap-around, direct selection
//! - Mirroring elapsed time and duration for display
//!
//! Audio decoding is the media element's job; nothing here touches samples.

pub mod error;
pub mod player;
pub mod time_format;
pub mod traits;

pub use error::{PlaybackError, Result};
pub use player::{Player, NO_SONG_SELECTED, UNKNOWN_ARTIST};
pub use time_format::{format_time, next_index, previous_index};
pub use traits::{MediaElement, PlaybackState};

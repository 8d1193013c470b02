//! # Library Management Module
//!
//! Owns the song library database and provides repository patterns for data
//! access.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite database schema and migrations
//! - The append-only song table and its creation-ordered listing
//! - Playlist tables (schema only; nothing reads or writes them yet)
//!
//! Every repository is a trait with a SQLite implementation, so the upload
//! service can be exercised against a mock.

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use error::{LibraryError, Result};
pub use models::{NewSong, Song};
pub use repositories::{SongRepository, SqliteSongRepository};

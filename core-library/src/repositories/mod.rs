//! Repository traits and their SQLite implementations

mod song;

pub use song::{SongRepository, SqliteSongRepository};

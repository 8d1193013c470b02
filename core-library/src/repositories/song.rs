//! Song repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{NewSong, Song};
use async_trait::async_trait;
use bridge_traits::time::{Clock, SystemClock};
use sqlx::{query, query_as, SqlitePool};
use std::sync::Arc;
use tracing::debug;

/// Song repository interface for data access operations
///
/// Songs are append-only: there is no update or delete.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Insert a new song and return the stored row
    ///
    /// # Errors
    /// Returns error if:
    /// - Song validation fails
    /// - Database error occurs
    async fn insert(&self, song: &NewSong) -> Result<Song>;

    /// List every song, oldest first
    ///
    /// Ties on `created_at` are broken by `id`.
    async fn list_by_creation(&self) -> Result<Vec<Song>>;

    /// Find a song by its ID
    ///
    /// # Returns
    /// - `Ok(Some(song))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_id(&self, id: i64) -> Result<Option<Song>>;

    /// Count total songs
    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of SongRepository
pub struct SqliteSongRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteSongRepository {
    /// Create a new SqliteSongRepository stamped by the system clock
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
    async fn insert(&self, song: &NewSong) -> Result<Song> {
        song.validate().map_err(|e| LibraryError::InvalidInput {
            field: "Song".to_string(),
            message: e,
        })?;

        let now = self.clock.unix_timestamp();
        let mut tx = self.pool.begin().await?;

        let id = query(
            r#"
            INSERT INTO songs (
                title, artist, album, genre, duration, media_url,
                media_public_id, cover_art_url, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&song.title)
        .bind(&song.artist)
        .bind(&song.album)
        .bind(&song.genre)
        .bind(&song.duration)
        .bind(&song.media_url)
        .bind(&song.media_public_id)
        .bind(&song.cover_art_url)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let stored = query_as::<_, Song>("SELECT * FROM songs WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(song_id = stored.id, "Inserted song");
        Ok(stored)
    }

    async fn list_by_creation(&self) -> Result<Vec<Song>> {
        let songs = query_as::<_, Song>("SELECT * FROM songs ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(songs)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Song>> {
        let song = query_as::<_, Song>("SELECT * FROM songs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(song)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = query_as("SELECT COUNT(*) as count FROM songs")
            .fetch_one(&self.pool)
            .await
            .map(|row: (i64,)| row.0)?;

        Ok(count)
    }
}

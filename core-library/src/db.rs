//! # Database Pool
//!
//! Opens the SQLite store behind the song library and brings its schema up to
//! date.
//!
//! Every pool returned by [`create_pool`] has foreign keys enforced, the
//! embedded `migrations/` applied and one successful round trip behind it.
//! File-backed databases run in WAL mode and are created when missing.
//!
//! ```rust,ignore
//! use core_library::db::{create_pool, DatabaseConfig};
//!
//! let pool = create_pool(DatabaseConfig::new("sqlite:playo.db")).await?;
//! ```

use crate::{LibraryError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite:playo.db`
    pub database_url: String,
    /// Upper bound on open connections; 1 serialises all writes
    pub max_connections: u32,
    /// How long a caller waits for a free connection
    pub acquire_timeout: Duration,
    /// Idle connections are closed after this long; `None` keeps them
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    /// Single-connection pool for `database_url`.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }

    /// Private in-memory database.
    ///
    /// Each in-memory connection is a separate database, so the single
    /// connection is never recycled.
    pub fn in_memory() -> Self {
        Self {
            idle_timeout: None,
            ..Self::new(IN_MEMORY_URL)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Open, migrate and verify a pool.
///
/// # Errors
///
/// [`LibraryError::Database`] when the URL is malformed or the file cannot be
/// opened, [`LibraryError::Migration`] when the schema cannot be applied.
pub async fn create_pool(config: DatabaseConfig) -> Result<Pool<Sqlite>> {
    info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Opening song database"
    );

    let mut options = SqliteConnectOptions::from_str(&config.database_url)?
        .foreign_keys(true)
        .create_if_missing(true);
    if !config.is_in_memory() {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    // An in-memory database lives only as long as its connection; keep it open.
    let in_memory = config.is_in_memory();
    let max_lifetime = (!in_memory).then_some(Duration::from_secs(1800));
    let idle_timeout = if in_memory { None } else { config.idle_timeout };

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(u32::from(in_memory))
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(idle_timeout)
        .max_lifetime(max_lifetime)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!(error = %e, "Could not open song database");
            LibraryError::Database(e)
        })?;

    run_migrations(&pool).await?;
    health_check(&pool).await?;

    info!("Song database ready");
    Ok(pool)
}

/// In-memory pool with the schema applied.
pub async fn create_test_pool() -> Result<Pool<Sqlite>> {
    create_pool(DatabaseConfig::in_memory()).await
}

async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        error!(error = %e, "Schema migration failed");
        LibraryError::Migration(e.to_string())
    })?;
    debug!("Schema up to date");
    Ok(())
}

/// One trivial query through the pool.
pub async fn health_check(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

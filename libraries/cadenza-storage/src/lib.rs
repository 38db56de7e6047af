//! Cadenza Storage
//!
//! `SQLite` persistence for player settings. Values are stored as JSON
//! behind string keys; the playback core reaches them through the
//! `SettingsStore` implementation in [`settings`].
//!
//! # Example
//!
//! ```rust,no_run
//! use cadenza_core::SettingsStore;
//! use cadenza_storage::{create_pool, run_migrations, SqliteSettingsStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadenza.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteSettingsStore::new(pool);
//! store.save_volume(65).await?;
//! assert_eq!(store.load_volume().await?, Some(65));
//! # Ok(())
//! # }
//! ```

mod error;
pub mod settings;

pub use error::{Result, StorageError};
pub use settings::SqliteSettingsStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before the pool is handed to any store.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// The database file is created if missing and opened in WAL mode.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://cadenza.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(database_url, "creating sqlite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

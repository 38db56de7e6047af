//! Player settings
//!
//! Key-value pairs with JSON-serialized values.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadenza_storage::settings;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! settings::set_setting(pool, settings::SETTING_VOLUME, &serde_json::json!(40)).await?;
//! let volume = settings::get_setting(pool, settings::SETTING_VOLUME).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use cadenza_core::SettingsStore;
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// Audio volume setting (0-100)
pub const SETTING_VOLUME: &str = "audio.volume";

/// Get a single setting value
///
/// Returns `Ok(None)` if the key has never been written.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let raw: String = row.try_get("value")?;
            Ok(Some(serde_json::from_str(&raw)?))
        }
        None => Ok(None),
    }
}

/// Insert or replace a setting value
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO settings (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(raw)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a setting; returns whether it existed
pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// `SettingsStore` backed by the `settings` table
#[derive(Debug, Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn read_volume(&self) -> Result<Option<u8>> {
        let Some(value) = get_setting(&self.pool, SETTING_VOLUME).await? else {
            return Ok(None);
        };

        let level = value
            .as_u64()
            .filter(|level| *level <= 100)
            .ok_or_else(|| {
                StorageError::invalid_value(SETTING_VOLUME, format!("expected 0-100, got {value}"))
            })?;

        Ok(Some(level as u8))
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn load_volume(&self) -> cadenza_core::Result<Option<u8>> {
        Ok(self.read_volume().await?)
    }

    async fn save_volume(&self, volume: u8) -> cadenza_core::Result<()> {
        set_setting(&self.pool, SETTING_VOLUME, &serde_json::json!(volume)).await?;
        debug!(volume, "volume persisted");
        Ok(())
    }
}

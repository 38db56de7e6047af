//! Settings persistence against a real `SQLite` file

use cadenza_core::{CoreError, SettingsStore};
use cadenza_storage::{create_pool, run_migrations, settings, SqliteSettingsStore};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database that lives as long as its temp dir
struct TestDb {
    pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = create_pool(&db_url).await.expect("Failed to create pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }
}

#[tokio::test]
async fn test_set_and_get_setting() {
    let db = TestDb::new().await;

    let value = serde_json::json!({"level": 3});
    settings::set_setting(&db.pool, "ui.zoom", &value).await.unwrap();

    let result = settings::get_setting(&db.pool, "ui.zoom").await.unwrap();
    assert_eq!(result, Some(value));
}

#[tokio::test]
async fn test_get_non_existent_setting() {
    let db = TestDb::new().await;

    let result = settings::get_setting(&db.pool, "non_existent_key").await.unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_update_existing_setting() {
    let db = TestDb::new().await;

    settings::set_setting(&db.pool, settings::SETTING_VOLUME, &serde_json::json!(10))
        .await
        .unwrap();
    settings::set_setting(&db.pool, settings::SETTING_VOLUME, &serde_json::json!(90))
        .await
        .unwrap();

    let result = settings::get_setting(&db.pool, settings::SETTING_VOLUME)
        .await
        .unwrap();
    assert_eq!(result, Some(serde_json::json!(90)));
}

#[tokio::test]
async fn test_delete_setting() {
    let db = TestDb::new().await;

    settings::set_setting(&db.pool, "ui.zoom", &serde_json::json!(2))
        .await
        .unwrap();

    assert!(settings::delete_setting(&db.pool, "ui.zoom").await.unwrap());
    assert!(!settings::delete_setting(&db.pool, "ui.zoom").await.unwrap());
    assert_eq!(settings::get_setting(&db.pool, "ui.zoom").await.unwrap(), None);
}

#[tokio::test]
async fn test_store_volume_round_trip() {
    let db = TestDb::new().await;
    let store = SqliteSettingsStore::new(db.pool.clone());

    assert_eq!(store.load_volume().await.unwrap(), None);

    store.save_volume(65).await.unwrap();
    assert_eq!(store.load_volume().await.unwrap(), Some(65));
}

#[tokio::test]
async fn test_store_volume_survives_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}", temp_dir.path().join("reopen.db").display());

    {
        let pool = create_pool(&db_url).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteSettingsStore::new(pool.clone()).save_volume(12).await.unwrap();
        pool.close().await;
    }

    let pool = create_pool(&db_url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let store = SqliteSettingsStore::new(pool);
    assert_eq!(store.load_volume().await.unwrap(), Some(12));
}

#[tokio::test]
async fn test_store_rejects_out_of_range_volume() {
    let db = TestDb::new().await;
    settings::set_setting(&db.pool, settings::SETTING_VOLUME, &serde_json::json!(400))
        .await
        .unwrap();

    let store = SqliteSettingsStore::new(db.pool.clone());
    let err = store.load_volume().await.unwrap_err();
    assert!(matches!(err, CoreError::Settings(_)));
}

#[tokio::test]
async fn test_store_rejects_non_numeric_volume() {
    let db = TestDb::new().await;
    settings::set_setting(&db.pool, settings::SETTING_VOLUME, &serde_json::json!("loud"))
        .await
        .unwrap();

    let store = SqliteSettingsStore::new(db.pool.clone());
    assert!(store.load_volume().await.is_err());
}

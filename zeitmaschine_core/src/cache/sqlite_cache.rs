//! SQLite-based implementation of the ImageCache trait
//!
//! Blobs are stored in a single table keyed by request path. The table is
//! created on first open; there are no migrations.

use crate::cache::{CacheStats, ImageCache};
use crate::error::{CacheError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};

/// File name of the cache database
pub const STORE_FILE: &str = "zcache.db";

/// SQLite-based image cache
///
/// Writes are add-only: storing a key that already exists fails with
/// `CacheError::WriteConflict` and leaves the existing blob untouched.
pub struct SqliteImageCache {
    pool: SqlitePool,
    path: PathBuf,
}

impl SqliteImageCache {
    /// Open the cache database at `db_path`, creating it if absent
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(CacheError::from)?;
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                CacheError::unavailable(format!(
                    "Failed to open cache database {}: {e}",
                    db_path.display()
                ))
            })?;

        Self::initialize_schema(&pool).await?;

        log::debug!("Opened image cache at {}", db_path.display());

        Ok(Self {
            pool,
            path: db_path.to_path_buf(),
        })
    }

    async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
        let schema = r#"
            CREATE TABLE IF NOT EXISTS image_store (
                key TEXT PRIMARY KEY NOT NULL,
                value BLOB NOT NULL,
                created_at INTEGER NOT NULL
            );
        "#;

        sqlx::raw_sql(schema).execute(pool).await.map_err(|e| {
            CacheError::unavailable(format!("Failed to initialize cache schema: {e}"))
        })?;

        Ok(())
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of cached entries and their combined size
    pub async fn stats(&self) -> Result<CacheStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS entry_count, COALESCE(SUM(LENGTH(value)), 0) AS total_bytes FROM image_store",
        )
        .fetch_one(&self.pool)
        .await?;

        let entry_count: i64 = row.try_get("entry_count")?;
        let total_bytes: i64 = row.try_get("total_bytes")?;

        Ok(CacheStats {
            entry_count: entry_count as u64,
            total_bytes: total_bytes as u64,
        })
    }

    /// Remove every entry, returning how many were removed
    pub async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM image_store")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Close the underlying connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ImageCache for SqliteImageCache {
    async fn get(&self, key: &str) -> Result<Bytes> {
        let row = sqlx::query("SELECT value FROM image_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let value: Vec<u8> = row.try_get("value")?;
                Ok(Bytes::from(value))
            }
            None => Err(CacheError::miss(key).into()),
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<Bytes> {
        let now_millis = chrono::Utc::now().timestamp_millis();

        let result =
            sqlx::query("INSERT INTO image_store (key, value, created_at) VALUES (?, ?, ?)")
                .bind(key)
                .bind(&value[..])
                .bind(now_millis)
                .execute(&self.pool)
                .await;

        match result {
            Ok(_) => {
                log::info!("Cached image '{key}'");
                Ok(value)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(CacheError::write_conflict(key).into())
            }
            Err(e) => Err(CacheError::from(e).into()),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM image_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

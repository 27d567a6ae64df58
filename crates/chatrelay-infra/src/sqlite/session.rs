//! SQLite session store implementation.
//!
//! Implements `SessionStore` from `chatrelay-core` using sqlx with split
//! read/write pools. Expiry is a unix-millisecond column checked on read,
//! so an expired row is dead immediately and removed later by
//! `purge_expired`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::Row;

use chatrelay_core::store::session_store::SessionStore;
use chatrelay_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionStore`.
pub struct SqliteSessionStore {
    pool: DatabasePool,
}

impl SqliteSessionStore {
    /// Create a new session store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// When the live entry for `key` expires, if there is one.
    pub async fn expires_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        let row = sqlx::query("SELECT expires_at FROM sessions WHERE key = ? AND expires_at > ?")
            .bind(key)
            .bind(now_millis())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let millis: i64 = row
                    .try_get("expires_at")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let at = DateTime::from_timestamp_millis(millis)
                    .ok_or_else(|| RepositoryError::Query(format!("invalid expires_at: {millis}")))?;
                Ok(Some(at))
            }
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn expiry_millis(ttl: Duration) -> i64 {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now_millis().saturating_add(ttl_ms)
}

// ---------------------------------------------------------------------------
// SessionStore implementation
// ---------------------------------------------------------------------------

impl SessionStore for SqliteSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM sessions WHERE key = ? AND expires_at > ?")
            .bind(key)
            .bind(now_millis())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let value: String = row
                    .try_get("value")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO sessions (key, value, expires_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET
                   value = excluded.value,
                   expires_at = excluded.expires_at,
                   updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(expiry_millis(ttl))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now_millis())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url_for;

    const DAY: Duration = Duration::from_secs(86_400);

    async fn test_store() -> SqliteSessionStore {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url_for(dir.path());
        std::mem::forget(dir);
        SqliteSessionStore::new(DatabasePool::connect(&url).await.unwrap())
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = test_store().await;
        let value = r#"[{"role":"system","content":"héllo 🦀"}]"#;

        store.put("sess:s1", value, DAY).await.unwrap();

        let got = store.get("sess:s1").await.unwrap();
        assert_eq!(got.as_deref(), Some(value));
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let store = test_store().await;
        assert!(store.get("sess:missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_upserts() {
        let store = test_store().await;
        store.put("sess:s1", "[1]", DAY).await.unwrap();
        store.put("sess:s1", "[2]", DAY).await.unwrap();

        assert_eq!(store.get("sess:s1").await.unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn test_expired_entry_is_invisible() {
        let store = test_store().await;
        store.put("sess:s1", "[]", Duration::ZERO).await.unwrap();

        assert!(store.get("sess:s1").await.unwrap().is_none());
        assert!(store.expires_at("sess:s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_resets_expiry() {
        let store = test_store().await;
        store.put("sess:s1", "[]", Duration::ZERO).await.unwrap();
        store.put("sess:s1", "[]", DAY).await.unwrap();

        assert!(store.get("sess:s1").await.unwrap().is_some());
        let expires = store.expires_at("sess:s1").await.unwrap().unwrap();
        let remaining = expires - Utc::now();
        assert!(remaining > chrono::Duration::hours(23));
        assert!(remaining <= chrono::Duration::hours(24));
    }

    #[tokio::test]
    async fn test_purge_expired_removes_only_dead_rows() {
        let store = test_store().await;
        store.put("sess:dead-1", "[]", Duration::ZERO).await.unwrap();
        store.put("sess:dead-2", "[]", Duration::ZERO).await.unwrap();
        store.put("sess:live", "[]", DAY).await.unwrap();

        let removed = store.purge_expired().await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.get("sess:live").await.unwrap().is_some());

        assert_eq!(store.purge_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let store = test_store().await;
        store.put("sess:a", "A", DAY).await.unwrap();
        store.put("sess:b", "B", DAY).await.unwrap();

        assert_eq!(store.get("sess:a").await.unwrap().as_deref(), Some("A"));
        assert_eq!(store.get("sess:b").await.unwrap().as_deref(), Some("B"));
    }
}

//! Connection pools for the session database.
//!
//! SQLite serializes writers, so sessions are written through a
//! single-connection pool while reads fan out over a small read-only pool.
//! Both run in WAL mode so readers never block the writer.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

const READER_CONNECTIONS: u32 = 8;

/// Split reader/writer pools over one SQLite file.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (creating if needed) the database at `database_url` and apply
    /// pending migrations before any reader connects.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = connect_options(database_url)?;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        MIGRATOR.run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5)))
}

/// SQLite URL for `sessions.db` inside the data directory.
pub fn database_url_for(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("sessions.db").display())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_temp() -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::connect(&database_url_for(dir.path()))
            .await
            .unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn migrations_create_sessions_table() {
        let (_dir, pool) = open_temp().await;

        let columns: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info('sessions') ORDER BY cid")
                .fetch_all(&pool.reader)
                .await
                .unwrap();

        let names: Vec<&str> = columns.iter().map(|c| c.0.as_str()).collect();
        assert_eq!(names, vec!["key", "value", "expires_at", "updated_at"]);
    }

    #[tokio::test]
    async fn writer_runs_in_wal_mode() {
        let (_dir, pool) = open_temp().await;

        let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn reader_rejects_writes() {
        let (_dir, pool) = open_temp().await;

        let result = sqlx::query("DELETE FROM sessions")
            .execute(&pool.reader)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn reconnect_reuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url_for(dir.path());

        let first = DatabasePool::connect(&url).await.unwrap();
        sqlx::query("INSERT INTO sessions (key, value, expires_at, updated_at) VALUES ('k', 'v', 0, '')")
            .execute(&first.writer)
            .await
            .unwrap();
        first.writer.close().await;
        first.reader.close().await;

        let second = DatabasePool::connect(&url).await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&second.reader)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn database_url_points_into_data_dir() {
        let url = database_url_for(Path::new("/tmp/relay"));
        assert_eq!(url, "sqlite:///tmp/relay/sessions.db?mode=rwc");
    }
}

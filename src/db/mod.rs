use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

mod error;
mod queries;

pub use error::StoreError;

const MEMORY_URL: &str = "sqlite::memory:";

/// Handle to the `emails` table.
///
/// Cloning is cheap: every clone shares the same connection pool, so one
/// store can be handed to each facade at construction time.
#[derive(Clone, Debug)]
pub struct EmailStore {
    pool: SqlitePool,
}

impl EmailStore {
    /// Opens (creating if needed) the database behind `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let url = normalize_sqlite_url(database_url);
        let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
        let pool = if url == MEMORY_URL {
            // each in-memory connection is a separate database
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };
        tracing::debug!(url = %url, "sqlite pool ready");
        Ok(Self { pool })
    }

    /// Private in-memory store with the table already created.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let store = Self::connect(MEMORY_URL).await?;
        store.try_create_table().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the `emails` table. An existing table is left untouched.
    pub async fn try_create_table(&self) -> Result<(), StoreError> {
        let res = sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS emails (
                id           INTEGER PRIMARY KEY,
                email        TEXT UNIQUE,
                confirmed_at INTEGER,
                opt_out      INTEGER
            )"#,
        )
        .execute(&self.pool)
        .await;
        if let Err(e) = res {
            tracing::error!("failed to create emails table: {e}");
            return Err(e.into());
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Accepts `sqlite://path`, `sqlite:path`, `file:path`, a bare path or
/// `sqlite::memory:` and returns the form sqlx expects.
pub fn normalize_sqlite_url(input: &str) -> String {
    if input.starts_with("sqlite://") || input == MEMORY_URL {
        return input.to_string();
    }
    if let Some(rest) = input.strip_prefix("sqlite:") {
        return format!("sqlite://{}", rest.trim_start_matches('/'));
    }
    if let Some(rest) = input.strip_prefix("file:") {
        return format!("sqlite://{}", rest);
    }
    format!("sqlite://{}", input)
}

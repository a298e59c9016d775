//! Storage layer for Typo Payments.
//!
//! Owns the SQLite connection pool, the schema migrations, the demo fixture
//! dataset and every query the web handlers issue. Connections are handed
//! out per call through [`Database::with_conn`] and returned to the pool when
//! the closure finishes.

pub mod migrations;
pub mod models;
pub mod password;
pub mod queries;
pub mod reset;
pub mod seed;

use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, ErrorCode};
use thiserror::Error;
use tracing::info;

pub use seed::{BatchOutcome, SeedReport};

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

const BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum DbError {
    /// A UNIQUE or PRIMARY KEY constraint rejected the write.
    #[error("already exists: {0}")]
    Conflict(String),

    /// Any other constraint (foreign key, check, not null) rejected the write.
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("password hashing failed: {0}")]
    Password(String),

    #[error("migration '{name}' failed: {source}")]
    Migration {
        name: String,
        source: rusqlite::Error,
    },
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, msg) if err.code == ErrorCode::ConstraintViolation => {
                let detail = msg.clone().unwrap_or_else(|| err.to_string());
                match err.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => DbError::Conflict(detail),
                    _ => DbError::Constraint(detail),
                }
            }
            _ => DbError::Sqlite(e),
        }
    }
}

#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (or create) the database file behind a pool of `pool_size`
    /// connections and bring the schema up to date.
    pub fn open(path: &Path, pool_size: u32) -> Result<Self, DbError> {
        let manager = SqliteConnectionManager::file(path).with_init(init_connection);
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let db = Self { pool };
        db.with_conn(|conn| migrations::run_migrations(conn).map(|_| ()))?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// A private in-memory database. Every pooled connection to `:memory:` is
    /// a separate database, so the pool holds exactly one connection that is
    /// never recycled.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let manager = SqliteConnectionManager::memory().with_init(init_connection);
        let pool = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .connection_timeout(Duration::from_secs(10))
            .build(manager)?;

        let db = Self { pool };
        db.with_conn(|conn| migrations::run_migrations(conn).map(|_| ()))?;
        Ok(db)
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self.pool.get()?;
        f(&conn)
    }

    /// Like [`with_conn`](Self::with_conn) but with a mutable handle, needed
    /// to open transactions.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&mut Connection) -> Result<T, DbError>,
    {
        let mut conn = self.pool.get()?;
        f(&mut conn)
    }

    /// Schema plus fixture rows. Safe to call repeatedly: fixture batches
    /// that already exist are skipped whole.
    pub fn initialize(&self) -> Result<SeedReport, DbError> {
        self.with_conn_mut(|conn| {
            migrations::run_migrations(conn)?;
            seed::seed(conn)
        })
    }

    /// Seed only a database that has no users yet. Used on server start so a
    /// curated demo database is never touched.
    pub fn initialize_if_empty(&self) -> Result<Option<SeedReport>, DbError> {
        self.with_conn_mut(|conn| {
            migrations::run_migrations(conn)?;
            let users: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            if users > 0 {
                return Ok(None);
            }
            seed::seed(conn).map(Some)
        })
    }

    /// Drop every table and rebuild the demo dataset.
    pub fn reset(&self) -> Result<SeedReport, DbError> {
        self.with_conn_mut(reset::reset)
    }
}

fn init_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    // In-memory databases report "memory" instead of "wal".
    let _mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    conn.execute_batch(&format!(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = {};",
        BUSY_TIMEOUT_MS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_database_enables_foreign_keys_and_wal() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("typo.db"), 2).unwrap();

        let (fk, mode): (i32, String) = db
            .with_conn(|conn| {
                let fk = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
                let mode = conn.query_row("PRAGMA journal_mode;", [], |row| row.get(0))?;
                Ok((fk, mode))
            })
            .unwrap();

        assert_eq!(fk, 1);
        assert_eq!(mode, "wal");
    }

    #[test]
    fn initialize_if_empty_seeds_once() {
        let db = Database::open_in_memory().unwrap();

        let first = db.initialize_if_empty().unwrap();
        assert!(first.is_some());

        let second = db.initialize_if_empty().unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE);").unwrap();
        conn.execute("INSERT INTO t (name) VALUES ('a')", []).unwrap();

        let err: DbError = conn
            .execute("INSERT INTO t (name) VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::Conflict(_)), "got {err:?}");
    }
}

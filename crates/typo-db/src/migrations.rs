//! Embedded SQL migration runner.
//!
//! Each migration runs once, inside its own transaction, and is recorded in
//! the `_typo_migrations` table.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::DbError;

struct Migration {
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    name: "000_init",
    sql: include_str!("migrations/000_init.sql"),
}];

/// Tables the application owns, in the order they can be dropped without
/// tripping foreign keys.
pub const APP_TABLES: &[&str] = &["feedback", "payments", "users"];

pub const TRACKING_TABLE: &str = "_typo_migrations";

/// Apply every pending migration. Returns how many were applied.
pub fn run_migrations(conn: &Connection) -> Result<usize, DbError> {
    run_migrations_from_list(conn, MIGRATIONS)
}

fn run_migrations_from_list(conn: &Connection, migrations: &[Migration]) -> Result<usize, DbError> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {TRACKING_TABLE} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );"
    ))
    .map_err(|source| DbError::Migration {
        name: "_typo_migrations_bootstrap".to_string(),
        source,
    })?;

    let mut applied = 0;

    for migration in migrations {
        let already_applied: bool = conn.query_row(
            &format!("SELECT COUNT(*) > 0 FROM {TRACKING_TABLE} WHERE name = ?1"),
            [migration.name],
            |row| row.get(0),
        )?;

        if already_applied {
            debug!(migration = migration.name, "migration already applied, skipping");
            continue;
        }

        info!(migration = migration.name, "applying migration");

        let failed = |source| DbError::Migration {
            name: migration.name.to_string(),
            source,
        };

        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(migration.sql).map_err(failed)?;
        tx.execute(
            &format!("INSERT INTO {TRACKING_TABLE} (name) VALUES (?1)"),
            [migration.name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;

        applied += 1;
    }

    Ok(applied)
}

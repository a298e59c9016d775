use rusqlite::Connection;
use tracing::{info, warn};

use crate::migrations::{APP_TABLES, TRACKING_TABLE, run_migrations};
use crate::seed::{SeedReport, seed};
use crate::DbError;

/// Drop every application table and rebuild schema and fixtures.
///
/// Destructive and irreversible. On failure the database is left as the
/// failing step found it; nothing is repaired.
pub fn reset(conn: &mut Connection) -> Result<SeedReport, DbError> {
    warn!("Resetting database: dropping all tables");

    let tx = conn.transaction()?;
    for table in APP_TABLES.iter().chain(std::iter::once(&TRACKING_TABLE)) {
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
    }
    tx.commit()?;

    run_migrations(conn)?;
    let report = seed(conn)?;

    info!(?report, "Database reset complete");
    Ok(report)
}

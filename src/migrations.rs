//! Embedded database migrations
//!
//! The SQLite record store schema is compiled into the binary, so the
//! preferred backend needs nothing on disk besides the database file.

use crate::db::DbConnection;
use crate::error::Result;

/// All migrations in order, each as (filename, sql_content)
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_records.sql",
        include_str!("../migrations/001_create_records.sql"),
    ),
    (
        "002_create_session_indexes.sql",
        include_str!("../migrations/002_create_session_indexes.sql"),
    ),
];

/// Run all pending migrations on a connection.
///
/// Applied migrations are tracked in a `_migrations` table, so running this
/// against an existing database only applies what is missing.
pub fn run_migrations(conn: &DbConnection) -> Result<()> {
    tracing::info!("Running migrations...");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    for (filename, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?",
            [filename],
            |row| row.get(0),
        )?;

        if already_applied {
            tracing::debug!("Skipping already applied migration: {}", filename);
            continue;
        }

        tracing::info!("Running migration: {}", filename);

        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO _migrations (name) VALUES (?)", [filename])?;
    }

    tracing::info!("Migrations completed");
    Ok(())
}

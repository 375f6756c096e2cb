use chrono::Utc;
use rusqlite::OptionalExtension;

use super::{BackendKind, Collection, IndexField, RecordBackend};
use crate::db::{self, DbConnection, DbPool};
use crate::error::Result;
use crate::migrations::run_migrations;

/// Preferred backend: one `records` table keyed by `(collection, id)`,
/// with expression indexes on the session `date` and `workoutType` fields.
pub struct SqliteBackend {
    pool: DbPool,
}

impl SqliteBackend {
    /// Open the database and bring its schema up to date.
    pub fn open(database_url: &str) -> Result<Self> {
        probe(database_url)?;

        let pool = db::create_pool(database_url)?;
        run_migrations(&pool.get()?)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: DbPool) -> Result<Self> {
        run_migrations(&pool.get()?)?;
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Open the file once without the pool so an unusable path fails fast
/// instead of waiting out the pool's connection timeout.
fn probe(database_url: &str) -> Result<()> {
    let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" {
        return Ok(());
    }

    let conn = rusqlite::Connection::open(path)?;
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(())
}

impl RecordBackend for SqliteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    fn put(&self, collection: Collection, id: &str, data: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO records (collection, id, data, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(collection, id)
             DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
            rusqlite::params![collection.as_str(), id, data, Utc::now()],
        )?;
        Ok(())
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let data = conn
            .query_row(
                "SELECT data FROM records WHERE collection = ? AND id = ?",
                rusqlite::params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(data)
    }

    fn get_all(&self, collection: Collection) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT data FROM records WHERE collection = ?")?;
        let rows = stmt
            .query_map([collection.as_str()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
    }

    fn find_by_index(
        &self,
        collection: Collection,
        field: IndexField,
        value: &str,
    ) -> Result<Vec<String>> {
        let conn = self.conn()?;
        // The path is inlined so the expression matches the index definition.
        let sql = format!(
            "SELECT data FROM records WHERE collection = ? AND json_extract(data, '{}') = ?",
            field.json_path()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params![collection.as_str(), value], |row| {
                row.get(0)
            })?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM records WHERE collection = ? AND id = ?",
            rusqlite::params![collection.as_str(), id],
        )?;
        Ok(())
    }

    fn clear(&self, collection: Collection) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM records WHERE collection = ?",
            [collection.as_str()],
        )?;
        Ok(())
    }
}

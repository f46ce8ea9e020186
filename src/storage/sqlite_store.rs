use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

use super::{DocumentKind, DocumentStore, Record};
use crate::derivation::SequenceWindow;
use crate::error::{Result, VbmsError};

pub const STORE_DB: &str = "vbms.db";

/// SQLite-backed document store
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create the store database inside `vbms_dir`
    pub fn open(vbms_dir: &Path) -> Result<Self> {
        let path = vbms_dir.join(STORE_DB);
        let conn = Connection::open(&path)?;

        let store = Self {
            conn,
            path: Some(path),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Throwaway store, mostly for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.init_schema()?;
        Ok(store)
    }

    /// Database file, `None` for an in-memory store
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                display_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                body TEXT NOT NULL
            )",
            [],
        )?;

        // Display ids are unique per kind; this index is the only guard
        // against two writers generating the same one.
        self.conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_documents_display_id
             ON documents(kind, display_id) WHERE display_id IS NOT NULL",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(kind, created_at)",
            [],
        )?;

        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    fn count_documents(&self, kind: DocumentKind, window: SequenceWindow) -> Result<u64> {
        let count: i64 = match window {
            SequenceWindow::AllTime => self.conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE kind = ?1",
                [kind.to_string()],
                |row| row.get(0),
            )?,
            SequenceWindow::Since(start) => self.conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE kind = ?1 AND created_at >= ?2",
                params![kind.to_string(), timestamp(start)],
                |row| row.get(0),
            )?,
        };
        Ok(count as u64)
    }

    fn create<R: Record>(&self, record: &R) -> Result<()> {
        let base = record.base();
        let body = serde_json::to_string(record)?;

        self.conn
            .execute(
                "INSERT INTO documents (id, kind, display_id, created_at, updated_at, body)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    base.id.to_string(),
                    R::KIND.to_string(),
                    record.display_id(),
                    timestamp(base.created_at),
                    timestamp(base.updated_at),
                    body,
                ],
            )
            .map_err(|e| write_error(e, record.display_id()))?;

        debug!(kind = %R::KIND, id = %base.id, display_id = ?record.display_id(), "created document");
        Ok(())
    }

    fn save<R: Record>(&self, record: &R) -> Result<()> {
        let base = record.base();
        let body = serde_json::to_string(record)?;

        let updated = self
            .conn
            .execute(
                "UPDATE documents SET display_id = ?3, updated_at = ?4, body = ?5
                 WHERE kind = ?1 AND id = ?2",
                params![
                    R::KIND.to_string(),
                    base.id.to_string(),
                    record.display_id(),
                    timestamp(base.updated_at),
                    body,
                ],
            )
            .map_err(|e| write_error(e, record.display_id()))?;

        if updated == 0 {
            return Err(VbmsError::EntityNotFound(base.id.to_string()));
        }

        debug!(kind = %R::KIND, id = %base.id, "saved document");
        Ok(())
    }

    fn find<R: Record>(&self, id: &Uuid) -> Result<Option<R>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE kind = ?1 AND id = ?2",
                params![R::KIND.to_string(), id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|b| serde_json::from_str(&b).map_err(VbmsError::from))
            .transpose()
    }

    fn find_by_display_id<R: Record>(&self, display_id: &str) -> Result<Option<R>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE kind = ?1 AND display_id = ?2",
                params![R::KIND.to_string(), display_id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|b| serde_json::from_str(&b).map_err(VbmsError::from))
            .transpose()
    }

    fn list<R: Record>(&self) -> Result<Vec<R>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM documents WHERE kind = ?1 ORDER BY created_at, rowid",
        )?;

        let bodies = stmt
            .query_map([R::KIND.to_string()], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        bodies
            .iter()
            .map(|b| serde_json::from_str(b).map_err(VbmsError::from))
            .collect()
    }
}

/// Fixed-width UTC timestamp so that string comparison matches time order
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn write_error(e: rusqlite::Error, display_id: Option<&str>) -> VbmsError {
    if let rusqlite::Error::SqliteFailure(ref err, _) = e {
        if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            if let Some(display_id) = display_id {
                return VbmsError::DuplicateId(display_id.to_string());
            }
        }
    }
    e.into()
}

impl From<rusqlite::Error> for VbmsError {
    fn from(e: rusqlite::Error) -> Self {
        VbmsError::Storage(format!("SQLite error: {}", e))
    }
}

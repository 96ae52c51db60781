use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::{NoteGateway, NoteRecord};
use crate::entity::{Note, NoteId, UserId};
use crate::error::{NoteError, Result};

const NOTE_COLUMNS: &str = "id, owner, name, content, private, create_time";

/// SQLite-backed note store
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create the note database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened note database");

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a private database that lives as long as the store
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Location of the database file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init_schema(&self) -> Result<()> {
        // AUTOINCREMENT keeps ids of deleted notes from being handed out again
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner INTEGER NOT NULL,
                name TEXT,
                content TEXT NOT NULL,
                private INTEGER NOT NULL DEFAULT 0,
                create_time TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_notes_owner ON notes(owner);
            ",
        )?;
        Ok(())
    }

    fn query_one(&self, sql: &str, params: impl rusqlite::Params) -> Result<Option<NoteRecord>> {
        let record = self
            .conn
            .query_row(sql, params, record_from_row)
            .optional()?;
        Ok(record)
    }

    fn modify(&self, id: NoteId, sql: &str, params: impl rusqlite::Params) -> Result<NoteRecord> {
        self.query_one(sql, params)?.ok_or(NoteError::NotFound(id))
    }
}

impl NoteGateway for SqliteStore {
    fn create_note(&self, note: &Note) -> Result<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (owner, name, content, private, create_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                note.owner.0,
                note.name,
                note.content,
                note.private,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_note(&self, id: NoteId) -> Result<Option<NoteRecord>> {
        self.query_one(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
            [id],
        )
    }

    fn get_note_by_owner(&self, owner: UserId) -> Result<Vec<NoteRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE owner = ?1 ORDER BY id"
        ))?;

        let records = stmt
            .query_map([owner.0], record_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn delete_note(&self, id: NoteId) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    fn rename_note(&self, id: NoteId, name: Option<&str>) -> Result<NoteRecord> {
        self.modify(
            id,
            &format!("UPDATE notes SET name = ?2 WHERE id = ?1 RETURNING {NOTE_COLUMNS}"),
            params![id, name],
        )
    }

    fn update_note(&self, id: NoteId, content: &str, private: bool) -> Result<NoteRecord> {
        self.modify(
            id,
            &format!(
                "UPDATE notes SET content = ?2, private = ?3 WHERE id = ?1 RETURNING {NOTE_COLUMNS}"
            ),
            params![id, content, private],
        )
    }

    fn change_note_owner(&self, id: NoteId, owner: UserId) -> Result<NoteRecord> {
        self.modify(
            id,
            &format!("UPDATE notes SET owner = ?2 WHERE id = ?1 RETURNING {NOTE_COLUMNS}"),
            params![id, owner.0],
        )
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<NoteRecord> {
    let create_time: String = row.get(5)?;
    let create_time = DateTime::parse_from_rfc3339(&create_time)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(NoteRecord {
        id: row.get(0)?,
        owner: UserId(row.get(1)?),
        name: row.get(2)?,
        content: row.get(3)?,
        private: row.get(4)?,
        create_time,
    })
}

impl From<rusqlite::Error> for NoteError {
    fn from(e: rusqlite::Error) -> Self {
        NoteError::Storage(format!("SQLite error: {}", e))
    }
}

//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist, fetch, delete and list note rows.
//! - Own id allocation policy for inserts.
//!
//! # Invariants
//! - Inserting with `UNASSIGNED_NOTE_ID` allocates a fresh id.
//! - Inserting with a stored id overwrites every column of that row in place.
//! - Inserting with an id that is not stored allocates a fresh id; deleted ids
//!   are never handed out again (`AUTOINCREMENT`).
//! - Listing orders are total: `id` breaks every remaining tie.

use crate::db::DbError;
use crate::model::note::{Note, NoteId, NoteValidationError, UNASSIGNED_NOTE_ID};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    color_hex,
    created_at,
    is_pinned,
    image_uri
FROM notes";

const NOTE_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "description",
    "color_hex",
    "created_at",
    "is_pinned",
    "image_uri",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether this error comes from the storage layer itself
    /// (I/O, corruption, schema drift) rather than from caller input.
    pub fn is_storage_failure(&self) -> bool {
        match self {
            Self::Db(_)
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => true,
            Self::Validation(_) | Self::NotFound(_) => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid note: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Listing order for note queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteOrder {
    /// Pinned notes first, newest id first within each group.
    PinnedFirst,
    /// Newest `created_at` first.
    ByDate,
}

impl NoteOrder {
    fn order_by_sql(self) -> &'static str {
        match self {
            Self::PinnedFirst => "ORDER BY is_pinned DESC, id DESC",
            Self::ByDate => "ORDER BY created_at DESC, id DESC",
        }
    }

    /// Stable lowercase name used in log events and CLI flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PinnedFirst => "pinned_first",
            Self::ByDate => "by_date",
        }
    }
}

/// Repository interface for note CRUD and listing.
pub trait NoteRepository {
    /// Inserts a new note or overwrites an existing one; returns the stored row.
    fn insert_or_replace(&self, note: &Note) -> RepoResult<Note>;
    /// Deletes one note. Returns `false` when the id was not stored.
    fn delete(&self, id: NoteId) -> RepoResult<bool>;
    /// Gets one note by id.
    fn get_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists every note in the requested order.
    fn list(&self, order: NoteOrder) -> RepoResult<Vec<Note>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the connection
    ///   was not bootstrapped through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Wraps a connection whose schema was already checked by `try_new`.
    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_or_replace(&self, note: &Note) -> RepoResult<Note> {
        note.validate()?;

        if note.id != UNASSIGNED_NOTE_ID {
            let changed = self.conn.execute(
                "UPDATE notes
                 SET
                    title = ?2,
                    description = ?3,
                    color_hex = ?4,
                    created_at = ?5,
                    is_pinned = ?6,
                    image_uri = ?7
                 WHERE id = ?1;",
                params![
                    note.id,
                    note.title.as_str(),
                    note.description.as_str(),
                    note.color_hex,
                    note.created_at,
                    bool_to_int(note.is_pinned),
                    note.image_uri.as_deref(),
                ],
            )?;
            if changed > 0 {
                return Ok(note.clone());
            }
        }

        self.conn.execute(
            "INSERT INTO notes (
                title,
                description,
                color_hex,
                created_at,
                is_pinned,
                image_uri
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                note.title.as_str(),
                note.description.as_str(),
                note.color_hex,
                note.created_at,
                bool_to_int(note.is_pinned),
                note.image_uri.as_deref(),
            ],
        )?;

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            ..note.clone()
        })
    }

    fn delete(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_note_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list(&self, order: NoteOrder) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} {};", order.order_by_sql()))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id: NoteId = row.get("id")?;
    let is_pinned = match row.get::<_, i64>("is_pinned")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_pinned value `{other}` for note {id}"
            )));
        }
    };

    let note = Note {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        color_hex: row.get("color_hex")?,
        created_at: row.get("created_at")?,
        is_pinned,
        image_uri: row.get("image_uri")?,
    };
    note.validate()
        .map_err(|err| RepoError::InvalidData(format!("note {id}: {err}")))?;
    Ok(note)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }
    for column in NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

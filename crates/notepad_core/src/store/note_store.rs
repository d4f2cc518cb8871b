//! Shared note store with live listing queries.

use super::live::{self, LiveNotes, Subscriber};
use crate::db::{open_db, open_db_in_memory};
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{
    NoteOrder, NoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
use log::{debug, error};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Durable, queryable note storage.
///
/// Construct once at process start and share it (`Arc<NoteStore>`) with every
/// consumer. All methods take `&self` and are safe to call from any thread;
/// they may block on I/O, so UI code should call them off its event thread.
///
/// Reads and writes share one connection lock, so `find_by_id` and the
/// listings wait for an in-flight write (and its publish) to finish. Callers
/// that need to watch the list without contending with writers should hold a
/// [`LiveNotes`] subscription instead of polling.
pub struct NoteStore {
    conn: Mutex<Connection>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl NoteStore {
    /// Opens (or creates) a store backed by the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a store backed by a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps a connection that was bootstrapped via `db::open_db*`.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is absent.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        let _ = SqliteNoteRepository::try_new(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Inserts a new note or fully overwrites the stored note with the same id.
    ///
    /// Returns the persisted record, carrying the store-assigned id when one
    /// was allocated. Live subscribers receive a fresh snapshot.
    pub fn insert_or_replace(&self, note: &Note) -> RepoResult<Note> {
        let conn = self.lock_conn();
        let stored = SqliteNoteRepository::from_ready(&conn).insert_or_replace(note)?;
        self.publish(&conn);
        Ok(stored)
    }

    /// Reads the note with `id`, lets `edit` derive its replacement, and
    /// writes the result, all under the write lock.
    ///
    /// `edit` receives `None` when `id` is not stored. Returning `None` from it
    /// writes nothing and notifies no one.
    pub fn modify<F>(&self, id: NoteId, edit: F) -> RepoResult<Option<Note>>
    where
        F: FnOnce(Option<Note>) -> Option<Note>,
    {
        let conn = self.lock_conn();
        let repo = SqliteNoteRepository::from_ready(&conn);
        let Some(replacement) = edit(repo.get_by_id(id)?) else {
            return Ok(None);
        };
        let stored = repo.insert_or_replace(&replacement)?;
        self.publish(&conn);
        Ok(Some(stored))
    }

    /// Deletes a note. Deleting a missing id is a no-op.
    ///
    /// Returns whether a row was removed; subscribers are only notified then.
    pub fn delete(&self, id: NoteId) -> RepoResult<bool> {
        let conn = self.lock_conn();
        let removed = SqliteNoteRepository::from_ready(&conn).delete(id)?;
        if removed {
            self.publish(&conn);
        }
        Ok(removed)
    }

    /// Gets one note, reporting `RepoError::NotFound` when it is not stored.
    pub fn get_by_id(&self, id: NoteId) -> RepoResult<Note> {
        self.find_by_id(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Gets one note, returning `None` when it is not stored.
    pub fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let conn = self.lock_conn();
        SqliteNoteRepository::from_ready(&conn).get_by_id(id)
    }

    /// Lists notes pinned first, then by descending id.
    pub fn list_all_pinned_first(&self) -> RepoResult<Vec<Note>> {
        self.list(NoteOrder::PinnedFirst)
    }

    /// Lists notes by descending creation time.
    pub fn list_all_by_date(&self) -> RepoResult<Vec<Note>> {
        self.list(NoteOrder::ByDate)
    }

    /// Lists notes in the requested order.
    pub fn list(&self, order: NoteOrder) -> RepoResult<Vec<Note>> {
        let conn = self.lock_conn();
        SqliteNoteRepository::from_ready(&conn).list(order)
    }

    /// Starts a live query in the requested order.
    ///
    /// The current snapshot is queued before this returns, so the first
    /// `recv` never waits. Registration happens under the write lock; no write
    /// can slip between the initial snapshot and the first notification.
    pub fn subscribe(&self, order: NoteOrder) -> RepoResult<LiveNotes> {
        let conn = self.lock_conn();
        let snapshot = SqliteNoteRepository::from_ready(&conn).list(order)?;
        let (subscriber, live) = live::channel(order);
        subscriber.push(snapshot);
        let mut subscribers = self.lock_subscribers();
        subscribers.push(subscriber);
        debug!(
            "event=live_subscribe module=store status=ok order={} subscribers={}",
            order.as_str(),
            subscribers.len()
        );
        Ok(live)
    }

    /// Number of subscriptions still registered.
    ///
    /// Dropped subscriptions are pruned lazily on the next publish.
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    // Caller must hold the connection lock so snapshots follow write order.
    fn publish(&self, conn: &Connection) {
        let mut subscribers = self.lock_subscribers();
        if subscribers.is_empty() {
            return;
        }

        let repo = SqliteNoteRepository::from_ready(conn);
        let mut pinned_first: Option<Vec<Note>> = None;
        let mut by_date: Option<Vec<Note>> = None;
        let before = subscribers.len();
        let mut failed = false;

        subscribers.retain(|subscriber| {
            let cached = match subscriber.order {
                NoteOrder::PinnedFirst => &mut pinned_first,
                NoteOrder::ByDate => &mut by_date,
            };
            if cached.is_none() {
                match repo.list(subscriber.order) {
                    Ok(notes) => *cached = Some(notes),
                    Err(err) => {
                        if !failed {
                            error!(
                                "event=live_publish module=store status=error order={} error={}",
                                subscriber.order.as_str(),
                                err
                            );
                        }
                        failed = true;
                        return true;
                    }
                }
            }
            match cached {
                Some(snapshot) => subscriber.push(snapshot.clone()),
                None => true,
            }
        });

        debug!(
            "event=live_publish module=store status={} subscribers={} pruned={}",
            if failed { "partial" } else { "ok" },
            subscribers.len(),
            before - subscribers.len()
        );
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        // SQLite state stays consistent across a panicked lock holder.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

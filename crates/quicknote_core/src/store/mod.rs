//! Canonical note store with push-based change notification.
//!
//! # Responsibility
//! - Own the SQLite connection and all note/tag mutations.
//! - Publish the full ordered snapshot to subscribers after every
//!   successful mutation.
//!
//! # Invariants
//! - Snapshot order is creation order (`created_at ASC, rowid ASC`).
//! - `subscribe` delivers the current snapshot before any later update.
//! - Disconnected subscribers are pruned on publish, never reported as
//!   errors.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::note::{NoteDraft, NoteId, NoteWithTags, Tag};
use crate::repo::note_repo::{NoteListQuery, NoteRepository, RepoError, SqliteNoteRepository};
use crate::service::note_service::{NoteService, NoteServiceError};
use log::{debug, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for persistence and snapshot operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Service(NoteServiceError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<NoteServiceError> for StoreError {
    fn from(value: NoteServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Service(NoteServiceError::from(value))
    }
}

/// SQLite-backed note store with subscriber notification.
pub struct NoteStore {
    conn: Connection,
    subscribers: Vec<Sender<Vec<NoteWithTags>>>,
}

impl NoteStore {
    /// Opens a file-backed store with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens an in-memory store, used by tests and previews.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            subscribers: Vec::new(),
        }
    }

    /// Registers a subscriber and delivers the current snapshot immediately.
    ///
    /// Every later successful mutation pushes a fresh snapshot into the
    /// returned channel.
    pub fn subscribe(&mut self) -> StoreResult<Receiver<Vec<NoteWithTags>>> {
        let snapshot = self.snapshot()?;
        let (sender, receiver) = channel();
        // The receiver is alive in this scope, so the initial send cannot fail.
        let _ = sender.send(snapshot);
        self.subscribers.push(sender);
        debug!(
            "event=store_subscribe module=store status=ok subscribers={}",
            self.subscribers.len()
        );
        Ok(receiver)
    }

    /// Loads the full non-deleted snapshot in creation order.
    pub fn snapshot(&mut self) -> StoreResult<Vec<NoteWithTags>> {
        let repo = SqliteNoteRepository::try_new(&mut self.conn)?;
        Ok(repo.list_notes(&NoteListQuery::default())?)
    }

    /// Creates one note and notifies subscribers.
    pub fn create_note(&mut self, draft: &NoteDraft) -> StoreResult<NoteWithTags> {
        let created = {
            let repo = SqliteNoteRepository::try_new(&mut self.conn)?;
            let service = NoteService::new(repo);
            service.create_note(draft)?
        };
        info!(
            "event=note_create module=store status=ok note_id={}",
            created.note.id
        );
        self.publish()?;
        Ok(created)
    }

    /// Replaces one note's fields and notifies subscribers.
    pub fn update_note(&mut self, id: NoteId, draft: &NoteDraft) -> StoreResult<NoteWithTags> {
        let updated = {
            let repo = SqliteNoteRepository::try_new(&mut self.conn)?;
            let service = NoteService::new(repo);
            service.update_note(id, draft)?
        };
        info!("event=note_update module=store status=ok note_id={id}");
        self.publish()?;
        Ok(updated)
    }

    /// Replaces one note's full tag set and notifies subscribers.
    pub fn set_note_tags(&mut self, id: NoteId, tags: Vec<String>) -> StoreResult<NoteWithTags> {
        let tagged = {
            let repo = SqliteNoteRepository::try_new(&mut self.conn)?;
            let mut service = NoteService::new(repo);
            service.set_note_tags(id, tags)?
        };
        info!("event=note_set_tags module=store status=ok note_id={id}");
        self.publish()?;
        Ok(tagged)
    }

    /// Tombstones one note and notifies subscribers.
    pub fn delete_note(&mut self, id: NoteId) -> StoreResult<()> {
        {
            let repo = SqliteNoteRepository::try_new(&mut self.conn)?;
            let service = NoteService::new(repo);
            service.delete_note(id)?;
        }
        info!("event=note_delete module=store status=ok note_id={id}");
        self.publish()?;
        Ok(())
    }

    /// Gets one note with tags by stable ID.
    pub fn get_note(&mut self, id: NoteId) -> StoreResult<Option<NoteWithTags>> {
        let repo = SqliteNoteRepository::try_new(&mut self.conn)?;
        Ok(repo.get_note(id)?)
    }

    /// Lists all known tags sorted by name.
    pub fn list_tags(&mut self) -> StoreResult<Vec<Tag>> {
        let repo = SqliteNoteRepository::try_new(&mut self.conn)?;
        Ok(repo.list_tags()?)
    }

    fn publish(&mut self) -> StoreResult<()> {
        if self.subscribers.is_empty() {
            return Ok(());
        }

        let snapshot = self.snapshot()?;
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
        debug!(
            "event=store_publish module=store status=ok notes={} subscribers={}",
            snapshot.len(),
            self.subscribers.len()
        );
        Ok(())
    }
}

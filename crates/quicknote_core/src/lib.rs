//! Core domain logic for QuickNote.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod feed;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use feed::NoteFeed;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteDraft, NoteId, NoteWithTags, Tag};
pub use repo::note_repo::{
    NoteListQuery, NoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
pub use search::query::{filter_notes, MatchFields};
pub use search::session::SearchSession;
pub use service::note_service::{derive_excerpt, NoteService, NoteServiceError};
pub use store::{NoteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

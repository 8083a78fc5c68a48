//! Note feed view-model: search session + live store snapshot.
//!
//! # Responsibility
//! - Combine a store subscription with the search session state machine.
//! - Recompute and republish the display list on every relevant change.
//!
//! # Invariants
//! - The display list always corresponds to the newest (snapshot, query)
//!   pair; superseded snapshots are never evaluated.
//! - While `Inactive`, the display list is the full snapshot.
//! - While `Active`, the display list is the query-engine result; an empty
//!   query shows the full snapshot (identity law).

use crate::model::note::NoteWithTags;
use crate::search::query::{filter_notes, MatchFields};
use crate::search::session::SearchSession;
use crate::store::{NoteStore, StoreResult};
use std::sync::mpsc::Receiver;

/// Presentation-facing feed of notes with live search.
///
/// Constructed explicitly and handed to the UI surface; the core never holds
/// a process-wide instance.
pub struct NoteFeed {
    updates: Receiver<Vec<NoteWithTags>>,
    notes: Vec<NoteWithTags>,
    session: SearchSession,
    fields: MatchFields,
    display: Vec<NoteWithTags>,
}

impl NoteFeed {
    /// Creates a feed subscribed to the store, matching on titles only.
    pub fn new(store: &mut NoteStore) -> StoreResult<Self> {
        Self::with_fields(store, MatchFields::default())
    }

    /// Creates a feed with an explicit match-field configuration.
    pub fn with_fields(store: &mut NoteStore, fields: MatchFields) -> StoreResult<Self> {
        let updates = store.subscribe()?;
        let mut feed = Self {
            updates,
            notes: Vec::new(),
            session: SearchSession::new(),
            fields,
            display: Vec::new(),
        };
        // Pick up the snapshot delivered on subscribe.
        feed.pump();
        Ok(feed)
    }

    /// Opens the search surface; the display stays on the full list until a
    /// query is typed.
    pub fn open_search(&mut self) {
        self.session.open();
        self.refresh();
    }

    /// Applies a query-text edit and re-runs the query engine.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.session.edit(query);
        self.refresh();
    }

    /// Empties the query while keeping search open; shows the full list.
    pub fn clear_query(&mut self) {
        self.session.clear();
        self.refresh();
    }

    /// Closes the search surface and falls back to the full list.
    pub fn close_search(&mut self) {
        self.session.close();
        self.refresh();
    }

    /// Drains pending store updates and re-evaluates against the newest.
    ///
    /// Intermediate snapshots are discarded unevaluated, so the display
    /// never reflects a superseded (snapshot, query) pair. Returns whether
    /// the snapshot changed.
    pub fn pump(&mut self) -> bool {
        let mut newest = None;
        while let Ok(snapshot) = self.updates.try_recv() {
            newest = Some(snapshot);
        }

        match newest {
            Some(snapshot) => {
                self.notes = snapshot;
                self.refresh();
                true
            }
            None => false,
        }
    }

    /// The ordered list the UI should render right now.
    pub fn display(&self) -> &[NoteWithTags] {
        &self.display
    }

    /// Current search session state.
    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Active match-field configuration.
    pub fn match_fields(&self) -> MatchFields {
        self.fields
    }

    fn refresh(&mut self) {
        self.display = match self.session.query() {
            Some(query) => filter_notes(&self.notes, query, self.fields),
            None => self.notes.clone(),
        };
    }
}

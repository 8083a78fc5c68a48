//! Note and tag domain model.
//!
//! # Responsibility
//! - Define the note read model rendered by list/detail surfaces.
//! - Define the draft shape accepted by create/update use-cases.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `created_at` is immutable after creation; only `updated_at` moves.
//! - Tag names are stored lowercase; display order is by name.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for every note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Note read model shared by list and detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable global ID used for linking and auditing.
    pub id: NoteId,
    /// Display title shown on the list card.
    pub title: String,
    /// Free-form category label shown above the title.
    pub category: String,
    /// Markdown body (not rendered in list view).
    pub content: String,
    /// Derived plain-text preview of `content` (nullable).
    pub excerpt: Option<String>,
    /// Creation timestamp in epoch milliseconds. Immutable.
    pub created_at: i64,
    /// Last-update timestamp in epoch milliseconds.
    pub updated_at: i64,
}

/// User-defined label attachable to multiple notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Storage rowid, unique per tag name.
    pub id: i64,
    /// Lowercase tag name.
    pub name: String,
}

/// Read-only composite of one note and its tags, used for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteWithTags {
    pub note: Note,
    /// Tags sorted by name ascending.
    pub tags: Vec<Tag>,
}

/// Write request for note create/update use-cases.
///
/// Timestamps and the derived excerpt are owned by storage and the service
/// layer; a draft carries only user-authored fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub category: String,
    pub content: String,
}

impl NoteDraft {
    /// Creates a draft from user-authored fields.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            content: content.into(),
        }
    }
}

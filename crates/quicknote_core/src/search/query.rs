//! Pure note filtering over an in-memory snapshot.
//!
//! # Responsibility
//! - Map (snapshot, query text) to the filtered, ordered display list.
//! - Keep match-field selection a caller concern.
//!
//! # Invariants
//! - The empty query is the identity: the snapshot is returned unchanged.
//! - Matching is a case-insensitive substring test; the query is literal
//!   text and is never trimmed.
//! - The filter is stable: relative snapshot order is preserved.

use crate::model::note::NoteWithTags;

/// Field set consulted by the query engine.
///
/// Title-only by default; category/content matching is opt-in per product
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchFields {
    pub title: bool,
    pub category: bool,
    pub content: bool,
}

impl Default for MatchFields {
    fn default() -> Self {
        Self {
            title: true,
            category: false,
            content: false,
        }
    }
}

impl MatchFields {
    /// Enables matching across title, category and content.
    pub fn all() -> Self {
        Self {
            title: true,
            category: true,
            content: true,
        }
    }
}

/// Filters the snapshot against a query string.
///
/// Pure function of its inputs: no side effects, no hidden state. An empty
/// result is a valid outcome, not an error.
pub fn filter_notes(
    notes: &[NoteWithTags],
    query: &str,
    fields: MatchFields,
) -> Vec<NoteWithTags> {
    if query.is_empty() {
        return notes.to_vec();
    }

    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|entry| note_matches(entry, needle.as_str(), fields))
        .cloned()
        .collect()
}

fn note_matches(entry: &NoteWithTags, needle: &str, fields: MatchFields) -> bool {
    let note = &entry.note;
    (fields.title && contains_insensitive(note.title.as_str(), needle))
        || (fields.category && contains_insensitive(note.category.as_str(), needle))
        || (fields.content && contains_insensitive(note.content.as_str(), needle))
}

fn contains_insensitive(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

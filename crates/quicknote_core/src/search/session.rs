//! Search-surface session state machine.
//!
//! # Responsibility
//! - Track whether the search surface is open and the current query text.
//! - Keep transition semantics independent of any UI toolkit.
//!
//! # Invariants
//! - Initial state is `Inactive`; there is no terminal state.
//! - Opening the surface always starts from an empty query.
//! - Closing resets the query; the full note list becomes visible again.
//! - Edits and clears while `Inactive` are ignored (the input surface does
//!   not exist in that state).

/// Ephemeral search-surface state owned by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchSession {
    /// Search surface closed; the full note list is displayed.
    #[default]
    Inactive,
    /// Search surface open with the current query text.
    Active {
        query: String,
    },
}

impl SearchSession {
    /// Creates a session in the initial `Inactive` state.
    pub fn new() -> Self {
        Self::Inactive
    }

    /// Opens the search surface with an empty query.
    ///
    /// Re-opening while already active keeps the current query.
    pub fn open(&mut self) {
        if matches!(self, Self::Inactive) {
            *self = Self::Active {
                query: String::new(),
            };
        }
    }

    /// Replaces the query text after a keystroke edit.
    pub fn edit(&mut self, query: impl Into<String>) {
        if let Self::Active { query: current } = self {
            *current = query.into();
        }
    }

    /// Empties the query while keeping the search surface open.
    pub fn clear(&mut self) {
        if let Self::Active { query } = self {
            query.clear();
        }
    }

    /// Closes the search surface and resets the query.
    pub fn close(&mut self) {
        *self = Self::Inactive;
    }

    /// Returns whether the search surface is open.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Returns the current query text while active.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Inactive => None,
            Self::Active { query } => Some(query.as_str()),
        }
    }
}

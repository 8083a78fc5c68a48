//! Note use-case service.
//!
//! # Responsibility
//! - Provide note create/update/get/list/delete APIs.
//! - Derive the plain-text excerpt projection shown on list cards.
//! - Normalize and atomically replace note tags.
//!
//! # Invariants
//! - `update_note` uses full content replacement semantics.
//! - A note title must contain at least one non-whitespace character.
//! - Tag names are normalized to lowercase and deduplicated.

use crate::model::note::{NoteDraft, NoteId, NoteWithTags, Tag};
use crate::repo::note_repo::{
    normalize_tag, normalize_tags, NoteListQuery, NoteRepository, RepoError, RepoResult,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EXCERPT_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Draft title is empty or whitespace-only.
    InvalidTitle,
    /// Tag input contains empty values.
    InvalidTag(String),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "note title cannot be blank"),
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note from a draft and returns the stored read model.
    pub fn create_note(&self, draft: &NoteDraft) -> Result<NoteWithTags, NoteServiceError> {
        validate_draft(draft)?;
        let excerpt = derive_excerpt(draft.content.as_str());
        let id = self.repo.create_note(Uuid::new_v4(), draft, excerpt.as_deref())?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces note fields fully and recomputes the excerpt projection.
    pub fn update_note(
        &self,
        id: NoteId,
        draft: &NoteDraft,
    ) -> Result<NoteWithTags, NoteServiceError> {
        validate_draft(draft)?;
        let excerpt = derive_excerpt(draft.content.as_str());
        self.repo.update_note(id, draft, excerpt.as_deref())?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    /// Gets one note by stable ID.
    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<NoteWithTags>> {
        self.repo.get_note(id)
    }

    /// Lists notes in creation order using optional single-tag filter.
    pub fn list_notes(
        &self,
        tag: Option<String>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<Vec<NoteWithTags>, NoteServiceError> {
        let normalized_tag = tag.and_then(|value| normalize_tag(value.as_str()));
        let query = NoteListQuery {
            tag: normalized_tag,
            limit,
            offset,
        };
        Ok(self.repo.list_notes(&query)?)
    }

    /// Atomically replaces the full tag set for one note.
    pub fn set_note_tags(
        &mut self,
        id: NoteId,
        tags: Vec<String>,
    ) -> Result<NoteWithTags, NoteServiceError> {
        for tag in &tags {
            if tag.trim().is_empty() {
                return Err(NoteServiceError::InvalidTag(tag.clone()));
            }
        }

        let normalized = normalize_tags(&tags);
        self.repo.set_note_tags(id, &normalized)?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "note missing after tag replacement",
            ))
    }

    /// Lists normalized tags known by storage.
    pub fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        self.repo.list_tags()
    }

    /// Tombstones one note by stable ID.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        Ok(self.repo.soft_delete_note(id)?)
    }
}

fn validate_draft(draft: &NoteDraft) -> Result<(), NoteServiceError> {
    if draft.title.trim().is_empty() {
        return Err(NoteServiceError::InvalidTitle);
    }
    Ok(())
}

/// Derives the card excerpt from markdown content.
///
/// Rules:
/// - Markdown images are dropped, links keep their label text.
/// - Markdown symbols removed, whitespace normalized.
/// - First 100 chars retained; blank results map to `None`.
pub fn derive_excerpt(content: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(EXCERPT_MAX_CHARS).collect())
    }
}

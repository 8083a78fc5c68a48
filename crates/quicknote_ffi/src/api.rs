//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for early-stage UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Return values are UTF-8 strings with stable meaning.

use quicknote_core::{
    core_version as core_version_inner, filter_notes, init_logging as init_logging_inner,
    ping as ping_inner, MatchFields, NoteDraft, NoteStore, NoteWithTags,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const ENTRY_DEFAULT_LIMIT: u32 = 20;
const ENTRY_LIMIT_MAX: u32 = 50;
const ENTRY_DB_FILE_NAME: &str = "quicknote_entry.sqlite3";
static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Note card payload returned by list/search APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNoteItem {
    /// Stable note ID in string form.
    pub note_id: String,
    /// Card title.
    pub title: String,
    /// Card category label.
    pub category: String,
    /// Derived plain-text excerpt (empty when absent).
    pub excerpt: String,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Tag names sorted ascending.
    pub tags: Vec<String>,
}

/// Response envelope for list/search flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNotesResponse {
    /// Notes to render (empty when no hits).
    pub items: Vec<EntryNoteItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
    /// Effective applied limit.
    pub applied_limit: u32,
}

impl EntryNotesResponse {
    fn failure(message: impl Into<String>, applied_limit: u32) -> Self {
        Self {
            items: Vec::new(),
            message: message.into(),
            applied_limit,
        }
    }
}

/// Generic action response envelope for command flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Optional affected note ID.
    pub note_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl EntryActionResponse {
    fn success(message: impl Into<String>, note_id: String) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Lists notes in creation order using entry-level defaults.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns deterministic envelope with applied limit.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list_notes(limit: Option<u32>) -> EntryNotesResponse {
    let applied_limit = normalize_entry_limit(limit);
    let snapshot = match load_snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            return EntryNotesResponse::failure(
                format!("entry_list_notes failed: {err}"),
                applied_limit,
            );
        }
    };

    respond_with_items(snapshot, applied_limit)
}

/// Filters notes against a literal query string.
///
/// Matching follows the core query engine: case-insensitive substring over
/// titles, empty query returns the full list.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns deterministic envelope with applied limit.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_search_notes(query: String, limit: Option<u32>) -> EntryNotesResponse {
    let applied_limit = normalize_entry_limit(limit);
    let snapshot = match load_snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            return EntryNotesResponse::failure(
                format!("entry_search_notes failed: {err}"),
                applied_limit,
            );
        }
    };

    let filtered = filter_notes(&snapshot, query.as_str(), MatchFields::default());
    respond_with_items(filtered, applied_limit)
}

/// Creates a note from the entry command flow.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns operation result and created note ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_create_note(title: String, category: String, content: String) -> EntryActionResponse {
    let draft = NoteDraft::new(title.trim(), category.trim(), content);
    match with_store(|store| store.create_note(&draft).map(|created| created.note.id)) {
        Ok(id) => EntryActionResponse::success("Note created.", id.to_string()),
        Err(err) => EntryActionResponse::failure(format!("entry_create_note failed: {err}")),
    }
}

/// Replaces the full tag set of one note.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns operation result and affected note ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_set_note_tags(note_id: String, tags: Vec<String>) -> EntryActionResponse {
    let id = match Uuid::parse_str(note_id.trim()) {
        Ok(id) => id,
        Err(_) => {
            return EntryActionResponse::failure(format!("invalid note id `{note_id}`"));
        }
    };

    match with_store(|store| store.set_note_tags(id, tags).map(|tagged| tagged.note.id)) {
        Ok(id) => EntryActionResponse::success("Tags replaced.", id.to_string()),
        Err(err) => EntryActionResponse::failure(format!("entry_set_note_tags failed: {err}")),
    }
}

/// Tombstones one note.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns operation result and affected note ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete_note(note_id: String) -> EntryActionResponse {
    let id = match Uuid::parse_str(note_id.trim()) {
        Ok(id) => id,
        Err(_) => {
            return EntryActionResponse::failure(format!("invalid note id `{note_id}`"));
        }
    };

    match with_store(|store| store.delete_note(id).map(|()| id)) {
        Ok(id) => EntryActionResponse::success("Note deleted.", id.to_string()),
        Err(err) => EntryActionResponse::failure(format!("entry_delete_note failed: {err}")),
    }
}

fn normalize_entry_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => ENTRY_DEFAULT_LIMIT,
        Some(value) if value > ENTRY_LIMIT_MAX => ENTRY_LIMIT_MAX,
        Some(value) => value,
        None => ENTRY_DEFAULT_LIMIT,
    }
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("QUICKNOTE_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
        })
        .clone()
}

fn load_snapshot() -> Result<Vec<NoteWithTags>, String> {
    with_store(|store| store.snapshot())
}

fn with_store<T>(
    f: impl FnOnce(&mut NoteStore) -> quicknote_core::StoreResult<T>,
) -> Result<T, String> {
    let db_path = resolve_entry_db_path();
    let mut store = NoteStore::open(&db_path).map_err(|err| format!("entry DB open failed: {err}"))?;
    f(&mut store).map_err(|err| err.to_string())
}

fn respond_with_items(notes: Vec<NoteWithTags>, applied_limit: u32) -> EntryNotesResponse {
    let items = notes
        .into_iter()
        .take(applied_limit as usize)
        .map(to_entry_note_item)
        .collect::<Vec<_>>();
    let message = if items.is_empty() {
        "No notes.".to_string()
    } else {
        format!("Found {} note(s).", items.len())
    };
    EntryNotesResponse {
        items,
        message,
        applied_limit,
    }
}

fn to_entry_note_item(entry: NoteWithTags) -> EntryNoteItem {
    EntryNoteItem {
        note_id: entry.note.id.to_string(),
        title: entry.note.title,
        category: entry.note.category,
        excerpt: entry.note.excerpt.unwrap_or_default(),
        created_at: entry.note.created_at,
        tags: entry.tags.into_iter().map(|tag| tag.name).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, entry_create_note, entry_delete_note, entry_list_notes, entry_search_notes,
        entry_set_note_tags, init_logging, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn entry_search_normalizes_limit_and_finds_created_note() {
        let token = unique_token("entry-search");
        let created = entry_create_note(token.clone(), "Inbox".to_string(), String::new());
        assert!(created.ok, "{}", created.message);
        let created_id = created
            .note_id
            .clone()
            .expect("created note should return note_id");

        let response = entry_search_notes(token, Some(500));
        assert_eq!(response.applied_limit, 50);
        assert!(response.items.iter().any(|item| item.note_id == created_id));
    }

    #[test]
    fn entry_list_applies_default_limit() {
        let response = entry_list_notes(None);
        assert_eq!(response.applied_limit, 20);
        assert!(response.items.len() <= 20);
    }

    #[test]
    fn entry_create_rejects_blank_title() {
        let response = entry_create_note("   ".to_string(), String::new(), "body".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("title"));
    }

    #[test]
    fn entry_tags_roundtrip_through_list() {
        let token = unique_token("entry-tags");
        let created = entry_create_note(token.clone(), String::new(), String::new());
        assert!(created.ok, "{}", created.message);
        let note_id = created.note_id.expect("create should return note_id");

        let tagged = entry_set_note_tags(
            note_id.clone(),
            vec!["Work".to_string(), "urgent".to_string()],
        );
        assert!(tagged.ok, "{}", tagged.message);

        let found = entry_search_notes(token, None);
        let item = found
            .items
            .iter()
            .find(|item| item.note_id == note_id)
            .expect("tagged note should be searchable");
        assert_eq!(item.tags, vec!["urgent".to_string(), "work".to_string()]);
    }

    #[test]
    fn entry_delete_removes_note_from_search() {
        let token = unique_token("entry-delete");
        let created = entry_create_note(token.clone(), String::new(), String::new());
        assert!(created.ok, "{}", created.message);
        let note_id = created.note_id.expect("create should return note_id");

        let deleted = entry_delete_note(note_id.clone());
        assert!(deleted.ok, "{}", deleted.message);

        let response = entry_search_notes(token, None);
        assert!(response.items.iter().all(|item| item.note_id != note_id));

        let conn = quicknote_core::db::open_db(super::resolve_entry_db_path()).expect("open db");
        let is_deleted: i64 = conn
            .query_row(
                "SELECT is_deleted FROM notes WHERE uuid = ?1",
                [note_id.as_str()],
                |row| row.get(0),
            )
            .expect("query tombstone row");
        assert_eq!(is_deleted, 1);
    }

    #[test]
    fn entry_rejects_malformed_note_id() {
        let response = entry_delete_note("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid note id"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}

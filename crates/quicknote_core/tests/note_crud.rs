use quicknote_core::db::open_db_in_memory;
use quicknote_core::{
    NoteDraft, NoteListQuery, NoteRepository, NoteService, NoteServiceError, RepoError,
    SqliteNoteRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip_derives_excerpt() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let draft = NoteDraft::new(
        "Grocery List",
        "Errands",
        "# Weekly run\n\n- milk\n- **eggs**",
    );
    let created = service.create_note(&draft).unwrap();

    assert_eq!(created.note.title, "Grocery List");
    assert_eq!(created.note.category, "Errands");
    assert_eq!(created.note.content, draft.content);
    assert!(created
        .note
        .excerpt
        .as_deref()
        .unwrap_or("")
        .contains("Weekly run"));
    assert!(created.tags.is_empty());
    assert!(created.note.created_at > 0);

    let fetched = service.get_note(created.note.id).unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn update_replaces_fields_and_recomputes_excerpt() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let created = service
        .create_note(&NoteDraft::new("Draft", "Inbox", "first body"))
        .unwrap();

    let updated = service
        .update_note(
            created.note.id,
            &NoteDraft::new("Final", "Archive", "second body with [link](https://example.com)"),
        )
        .unwrap();

    assert_eq!(updated.note.id, created.note.id);
    assert_eq!(updated.note.title, "Final");
    assert_eq!(updated.note.category, "Archive");
    assert!(updated.note.excerpt.as_deref().unwrap().contains("link"));
    assert_eq!(updated.note.created_at, created.note.created_at);
}

#[test]
fn update_missing_note_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let missing = Uuid::new_v4();
    let err = service
        .update_note(missing, &NoteDraft::new("title", "", "body"))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(id) if id == missing));
}

#[test]
fn blank_title_is_rejected_on_create_and_update() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let err = service
        .create_note(&NoteDraft::new("   ", "Inbox", "body"))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::InvalidTitle));

    let created = service
        .create_note(&NoteDraft::new("Valid", "", ""))
        .unwrap();
    let err = service
        .update_note(created.note.id, &NoteDraft::new("", "", "body"))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::InvalidTitle));
}

#[test]
fn soft_delete_hides_note_and_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let created = service
        .create_note(&NoteDraft::new("Short lived", "", "body"))
        .unwrap();

    service.delete_note(created.note.id).unwrap();
    service.delete_note(created.note.id).unwrap();

    assert!(service.get_note(created.note.id).unwrap().is_none());
    let listed = service.list_notes(None, None, 0).unwrap();
    assert!(listed.is_empty());
}

#[test]
fn list_returns_notes_in_creation_order() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let first = service
        .create_note(&NoteDraft::new("first", "", ""))
        .unwrap();
    let second = service
        .create_note(&NoteDraft::new("second", "", ""))
        .unwrap();
    let third = service
        .create_note(&NoteDraft::new("third", "", ""))
        .unwrap();

    let listed = service.list_notes(None, None, 0).unwrap();
    let ids: Vec<_> = listed.iter().map(|entry| entry.note.id).collect();
    assert_eq!(ids, vec![first.note.id, second.note.id, third.note.id]);
}

#[test]
fn list_pagination_with_limit_and_offset_is_stable() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let mut ids = Vec::new();
    for idx in 0..5 {
        let created = service
            .create_note(&NoteDraft::new(format!("note {idx}"), "", ""))
            .unwrap();
        ids.push(created.note.id);
    }

    let page = service.list_notes(None, Some(2), 1).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].note.id, ids[1]);
    assert_eq!(page[1].note.id, ids[2]);

    let tail = service.list_notes(None, None, 3).unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].note.id, ids[3]);
    assert_eq!(tail[1].note.id, ids[4]);
}

#[test]
fn repository_rejects_connection_without_required_notes_table() {
    let mut conn = Connection::open_in_memory().unwrap();

    let result = SqliteNoteRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("notes"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_notes_column() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE notes (
            uuid TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL
        );
        CREATE TABLE tags (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
        CREATE TABLE note_tags (note_uuid TEXT NOT NULL, tag_id INTEGER NOT NULL);",
    )
    .unwrap();

    let result = SqliteNoteRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "notes",
            column: "category"
        })
    ));
}

#[test]
fn repository_reports_corrupt_uuid_as_invalid_data() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO notes (uuid, title) VALUES ('not-a-uuid', 'broken');",
        [],
    )
    .unwrap();

    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let err = repo.list_notes(&NoteListQuery::default()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

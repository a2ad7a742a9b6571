use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_notes() {
    let mut app = helper::setup_test_app().await;

    let token = helper::register(&mut app, "jane@example.com").await;

    // verify empty note list
    let (status_code, notes) = helper::list_notes(&mut app, &token, "").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(Vec::<helper::Note>::new()), notes);

    // create note with defaults
    let payload = json!({ "title": "  Groceries ", "content": "Milk, eggs" });
    let (status_code, note, _) = helper::maybe_create_note(&mut app, &token, &payload).await;
    assert_eq!(StatusCode::OK, status_code);
    let note = note.unwrap();
    assert_eq!("Groceries", note.title);
    assert_eq!("Milk, eggs", note.content);
    assert!(!note.is_pinned);
    assert!(!note.is_archived);
    assert!(note.tags.is_empty());
    assert_eq!(None, note.color);
    assert_eq!(note.created_at, note.updated_at);

    // verify note
    let (status_code, single, _) = helper::single_note(&mut app, &token, &note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(&note), single.as_ref());

    // fetch notes, note is included
    let (status_code, notes) = helper::list_notes(&mut app, &token, "").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(vec![note]), notes);
}

#[tokio::test]
async fn test_create_note_normalization() {
    let mut app = helper::setup_test_app().await;

    let token = helper::register(&mut app, "jane@example.com").await;

    // delimited tags, truthy flags and a color
    let payload = json!({
        "title": "Trip",
        "content": "Pack bags",
        "tags": "travel, summer ,, ",
        "isPinned": "yes",
        "isArchived": 0,
        "color": "teal",
        "user": "00000000-0000-0000-0000-000000000000",
    });
    let (status_code, note, _) = helper::maybe_create_note(&mut app, &token, &payload).await;
    assert_eq!(StatusCode::OK, status_code);
    let note = note.unwrap();
    assert_eq!(vec!["travel".to_string(), "summer".to_string()], note.tags);
    assert!(note.is_pinned);
    assert!(!note.is_archived);
    assert_eq!(Some("teal".to_string()), note.color);
    assert_ne!(uuid::Uuid::nil(), note.user);

    // list of tags is taken as is
    let payload = json!({ "title": "Trip", "content": "Book", "tags": ["a", " b "] });
    let (_, note, _) = helper::maybe_create_note(&mut app, &token, &payload).await;
    assert_eq!(vec!["a".to_string(), " b ".to_string()], note.unwrap().tags);

    // anything else ends up without tags
    let payload = json!({ "title": "Trip", "content": "Book", "tags": ["a", 1] });
    let (_, note, _) = helper::maybe_create_note(&mut app, &token, &payload).await;
    assert!(note.unwrap().tags.is_empty());

    let payload = json!({ "title": "Trip", "content": "Book", "tags": 42 });
    let (_, note, _) = helper::maybe_create_note(&mut app, &token, &payload).await;
    assert!(note.unwrap().tags.is_empty());
}

#[tokio::test]
async fn test_create_note_validation() {
    let mut app = helper::setup_test_app().await;

    let token = helper::register(&mut app, "jane@example.com").await;

    let cases = [
        (json!({ "content": "Milk" }), "Title is required"),
        (json!({ "title": "Groceries" }), "Content is required"),
        (json!({ "title": "   ", "content": "Milk" }), "Title is required"),
        (json!({ "title": "Groceries", "content": "" }), "Content is required"),
        (json!({ "title": 12, "content": "Milk" }), "Title must be a string"),
        (
            json!({ "title": "Groceries", "content": "Milk", "color": 3 }),
            "Color must be a string",
        ),
    ];

    for (payload, message) in cases {
        let (status_code, _, error) = helper::maybe_create_note(&mut app, &token, &payload).await;
        assert_eq!(StatusCode::BAD_REQUEST, status_code, "{payload}");
        assert_eq!(message, error.unwrap().msg);
    }

    // nothing was stored
    let (_, notes) = helper::list_notes(&mut app, &token, "").await;
    assert_eq!(Some(0), notes.map(|notes| notes.len()));
}

#[tokio::test]
async fn test_delete_note() {
    let mut app = helper::setup_test_app().await;

    let token = helper::register(&mut app, "jane@example.com").await;

    let note = helper::create_note(&mut app, &token, "Groceries").await;
    let other_note = helper::create_note(&mut app, &token, "Chores").await;

    let (status_code, message, _) = helper::delete_note(&mut app, &token, &note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some("Note deleted".to_string()), message);

    // gone for good
    let (status_code, _, error) = helper::single_note(&mut app, &token, &note.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Note not found", error.unwrap().msg);

    let (status_code, _, error) = helper::delete_note(&mut app, &token, &note.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Note not found", error.unwrap().msg);

    // the other note is untouched
    let (_, notes) = helper::list_notes(&mut app, &token, "").await;
    assert_eq!(Some(vec![other_note]), notes);
}

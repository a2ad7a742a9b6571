use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_stats() {
    let mut app = helper::setup_test_app().await;

    let token = helper::register(&mut app, "jane@example.com").await;

    let (status_code, stats) = helper::stats(&mut app, &token).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(helper::Stats::default()), stats);

    let payload = json!({ "title": "Pinned", "content": "Pinned", "isPinned": true });
    helper::maybe_create_note(&mut app, &token, &payload).await;
    let archived = helper::create_note(&mut app, &token, "Archived").await;
    helper::toggle_archive(&mut app, &token, &archived.id).await;
    helper::create_note(&mut app, &token, "Plain").await;

    // everything was created just now
    let (status_code, stats) = helper::stats(&mut app, &token).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(
        Some(helper::Stats {
            total_notes: 3,
            today_notes: 3,
            week_notes: 3,
            pinned_notes: 1,
            archived_notes: 1,
        }),
        stats
    );

    // counts follow the flags as they are now
    helper::toggle_archive(&mut app, &token, &archived.id).await;
    let (_, stats) = helper::stats(&mut app, &token).await;
    assert_eq!(0, stats.unwrap().archived_notes);

    helper::delete_note(&mut app, &token, &archived.id).await;
    let (_, stats) = helper::stats(&mut app, &token).await;
    assert_eq!(2, stats.unwrap().total_notes);
}

use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn create_requires_authentication() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::ANNOUNCEMENTS,
            &json!({"title": "Notice", "content": "Text"}),
        )
        .await;

    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn created_announcement_gets_defaults() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_with_token(
            routes::ANNOUNCEMENTS,
            &json!({"title": "Holiday Notice", "content": "School closed Monday."}),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["kind"], "general");
    assert_eq!(res.body["priority"], "medium");
    assert_eq!(res.body["is_active"], true);
    assert_eq!(res.body["expiry_date"], json!(null));
}

#[tokio::test]
async fn expired_announcements_are_hidden_from_the_listing() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_with_token(
            routes::ANNOUNCEMENTS,
            &json!({
                "title": "Old exam schedule",
                "content": "Expired.",
                "expiry_date": "2020-01-01T00:00:00Z",
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let res = app
        .post_with_token(
            routes::ANNOUNCEMENTS,
            &json!({
                "title": "Upcoming exam schedule",
                "content": "Still relevant.",
                "expiry_date": "2099-01-01T00:00:00Z",
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let res = app.get_without_token(routes::ANNOUNCEMENTS).await;
    assert_eq!(res.status, 200);
    let items = res.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Upcoming exam schedule");
}

#[tokio::test]
async fn unknown_kind_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_with_token(
            routes::ANNOUNCEMENTS,
            &json!({"title": "T", "content": "C", "kind": "gossip"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_replaces_the_announcement() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_with_token(
            routes::ANNOUNCEMENTS,
            &json!({"title": "Draft", "content": "v1", "priority": "low"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);
    let id = res.id();

    let res = app
        .put_with_token(
            &routes::announcement(id),
            &json!({"title": "Final", "content": "v2", "priority": "high", "kind": "urgent"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["title"], "Final");
    assert_eq!(res.body["priority"], "high");
    assert_eq!(res.body["kind"], "urgent");
}

#[tokio::test]
async fn delete_removes_the_announcement() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_with_token(
            routes::ANNOUNCEMENTS,
            &json!({"title": "Temp", "content": "C"}),
            &token,
        )
        .await;
    let id = res.id();

    let res = app.delete_with_token(&routes::announcement(id), &token).await;
    assert_eq!(res.status, 200);

    let res = app.get_without_token(routes::ANNOUNCEMENTS).await;
    assert_eq!(res.body.as_array().unwrap().len(), 0);
}

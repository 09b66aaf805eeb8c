use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn anyone_can_submit_a_contact_message() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::CONTACT,
            &json!({
                "name": "Asha",
                "email": "asha@example.com",
                "message": "When do admissions open?",
            }),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["is_read"], false);
}

#[tokio::test]
async fn malformed_email_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::CONTACT,
            &json!({"name": "Asha", "email": "not-an-email", "message": "Hi"}),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn the_inbox_requires_authentication() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::CONTACT).await;

    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn admin_sees_messages_newest_first() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for subject in ["first", "second"] {
        let res = app
            .post_without_token(
                routes::CONTACT,
                &json!({
                    "name": "Asha",
                    "email": "asha@example.com",
                    "subject": subject,
                    "message": "Hello",
                }),
            )
            .await;
        assert_eq!(res.status, 201);
    }

    let res = app.get_with_token(routes::CONTACT, &token).await;
    assert_eq!(res.status, 200);
    let messages = res.body.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["subject"], "second");
}

#[tokio::test]
async fn marking_read_sticks() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_without_token(
            routes::CONTACT,
            &json!({"name": "Asha", "email": "a@b.com", "message": "Hi"}),
        )
        .await;
    let id = res.id();

    let res = app
        .put_with_token(&routes::contact_message_read(id), &json!({}), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["is_read"], true);

    let res = app.get_with_token(routes::CONTACT, &token).await;
    assert_eq!(res.body[0]["is_read"], true);
}

#[tokio::test]
async fn admin_can_delete_a_message() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_without_token(
            routes::CONTACT,
            &json!({"name": "Asha", "email": "a@b.com", "message": "Hi"}),
        )
        .await;
    let id = res.id();

    let res = app
        .delete_with_token(&routes::contact_message(id), &token)
        .await;
    assert_eq!(res.status, 200);

    let res = app.get_with_token(routes::CONTACT, &token).await;
    assert_eq!(res.body.as_array().unwrap().len(), 0);
}

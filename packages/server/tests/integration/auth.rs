use serde_json::json;

use crate::common::{ADMIN_USERNAME, TestApp, routes};

#[tokio::test]
async fn admin_can_log_in_with_seeded_credentials() {
    let app = TestApp::spawn().await;

    let token = app.admin_token().await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": ADMIN_USERNAME, "password": "wrong"}),
        )
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_with_unknown_username_matches_wrong_password_response() {
    let app = TestApp::spawn().await;

    let wrong_password = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": ADMIN_USERNAME, "password": "wrong"}),
        )
        .await;
    let unknown_user = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": "nobody", "password": "wrong"}),
        )
        .await;

    assert_eq!(wrong_password.status, unknown_user.status);
    assert_eq!(wrong_password.body["code"], unknown_user.body["code"]);
}

#[tokio::test]
async fn login_with_blank_credentials_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::LOGIN, &json!({"username": "", "password": ""}))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn me_returns_the_authenticated_user() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app.get_with_token(routes::ME, &token).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["username"], ADMIN_USERNAME);
    assert!(res.body["user_id"].is_number());
}

#[tokio::test]
async fn me_without_a_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::ME).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn me_with_a_garbage_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let res = app.get_with_token(routes::ME, "not.a.token").await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

use crate::common::{TestApp, png_file, routes, text};

#[tokio::test]
async fn create_requires_a_media_file() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_form_with_token(routes::GALLERY, vec![text("title", "Sports Day")], &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn created_item_exposes_its_media_url() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_form_with_token(
            routes::GALLERY,
            vec![
                text("title", "Sports Day"),
                text("category", "sports"),
                png_file("media", "race.png"),
            ],
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["category"], "sports");
    assert_eq!(res.body["media_type"], "photo");
    let url = res.body["media_url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
}

#[tokio::test]
async fn update_without_files_keeps_the_stored_media() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_form_with_token(
            routes::GALLERY,
            vec![text("title", "Annual Day"), png_file("media", "stage.png")],
            &token,
        )
        .await;
    assert_eq!(res.status, 201);
    let id = res.id();
    let original_url = res.body["media_url"].as_str().unwrap().to_string();

    let res = app
        .put_form_with_token(
            &routes::gallery_item(id),
            vec![text("title", "Annual Day 2026")],
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["title"], "Annual Day 2026");
    assert_eq!(res.body["media_url"], original_url.as_str());
}

#[tokio::test]
async fn inactive_items_are_hidden_from_the_public_listing() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_form_with_token(
            routes::GALLERY,
            vec![
                text("title", "Hidden"),
                text("is_active", "false"),
                png_file("media", "x.png"),
            ],
            &token,
        )
        .await;
    assert_eq!(res.status, 201);

    let res = app.get_without_token(routes::GALLERY).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn delete_removes_the_item() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_form_with_token(
            routes::GALLERY,
            vec![text("title", "Temp"), png_file("media", "t.png")],
            &token,
        )
        .await;
    let id = res.id();

    let res = app.delete_with_token(&routes::gallery_item(id), &token).await;
    assert_eq!(res.status, 200);

    let res = app.get_without_token(routes::GALLERY).await;
    assert_eq!(res.body.as_array().unwrap().len(), 0);
}

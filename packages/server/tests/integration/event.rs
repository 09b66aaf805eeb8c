use crate::common::{TestApp, png_file, routes, text};

#[tokio::test]
async fn events_are_listed_by_date_ascending() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_form_with_token(
            routes::EVENTS,
            vec![
                text("title", "Later"),
                text("description", "D"),
                text("date", "2026-12-01T09:00:00Z"),
            ],
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let res = app
        .post_form_with_token(
            routes::EVENTS,
            vec![
                text("title", "Sooner"),
                text("description", "D"),
                text("date", "2026-09-01T09:00:00Z"),
            ],
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let res = app.get_without_token(routes::EVENTS).await;
    assert_eq!(res.status, 200);
    let titles: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Sooner", "Later"]);
}

#[tokio::test]
async fn missing_date_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_form_with_token(
            routes::EVENTS,
            vec![text("title", "No date"), text("description", "D")],
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn category_filter_narrows_the_listing() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for (title, category) in [("Fair", "academic"), ("Match", "sports")] {
        let res = app
            .post_form_with_token(
                routes::EVENTS,
                vec![
                    text("title", title),
                    text("description", "D"),
                    text("date", "2026-09-01T09:00:00Z"),
                    text("category", category),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
    }

    let res = app
        .get_without_token(&format!("{}?category=sports", routes::EVENTS))
        .await;
    assert_eq!(res.status, 200);
    let events = res.body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Match");
}

#[tokio::test]
async fn update_keeps_the_stored_image_when_none_is_sent() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post_form_with_token(
            routes::EVENTS,
            vec![
                text("title", "Science Fair"),
                text("description", "Annual"),
                text("date", "2026-09-12T04:30:00Z"),
                png_file("image", "poster.png"),
            ],
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let id = res.id();
    let url = res.body["image_url"].as_str().unwrap().to_string();

    let res = app
        .put_form_with_token(
            &routes::event(id),
            vec![
                text("title", "Science Fair 2026"),
                text("description", "Annual"),
                text("date", "2026-09-12T04:30:00Z"),
            ],
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["image_url"], url.as_str());
}

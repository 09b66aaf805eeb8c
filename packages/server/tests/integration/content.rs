use serde_json::json;

use crate::common::{FormField, TestApp, png_file, routes, text};

mod create {
    use super::*;

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form_without_token(
                routes::CONTENT,
                vec![text("section", "hero"), text("title", "Welcome")],
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn minimal_record_gets_defaults() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![text("section", "hero"), text("title", "Welcome")],
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["section"], "hero");
        assert_eq!(res.body["title"], "Welcome");
        assert_eq!(res.body["order"], 0);
        assert_eq!(res.body["is_active"], true);
        assert_eq!(res.body["images"], json!([]));
        assert_eq!(res.body["subtitle"], json!(null));
    }

    #[tokio::test]
    async fn missing_title_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(routes::CONTENT, vec![text("section", "hero")], &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_section_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![text("section", "sidebar"), text("title", "T")],
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn uploads_become_ordered_image_references() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "facilities"),
                    text("title", "Our Labs"),
                    png_file("images", "lab1.png"),
                    png_file("images", "lab2.png"),
                    text("caption_0", "Chemistry lab"),
                ],
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["order"], 0);
        assert_eq!(images[1]["order"], 1);
        assert_eq!(images[0]["caption"], "Chemistry lab");
        assert_eq!(images[1]["caption"], json!(null));
        for image in images {
            let url = image["url"].as_str().unwrap();
            assert!(url.starts_with("/uploads/"), "unexpected url {url}");
            assert!(url.ends_with(".png"));
        }
    }

    #[tokio::test]
    async fn uploaded_image_is_served_back() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "about"),
                    text("title", "Campus"),
                    png_file("images", "gate.png"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let url = res.body["images"][0]["url"].as_str().unwrap().to_string();
        let fetched = app.get_without_token(&url).await;
        assert_eq!(fetched.status, 200);
        assert!(!fetched.text.is_empty());
    }

    #[tokio::test]
    async fn rejects_executable_uploads_without_creating_a_record() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "about"),
                    text("title", "Nope"),
                    FormField::File {
                        name: "images",
                        file_name: "payload.exe",
                        mime: "application/octet-stream",
                        bytes: vec![0x4d, 0x5a],
                    },
                ],
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let list = app.get_without_token(routes::CONTENT).await;
        assert_eq!(list.body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn rejects_more_than_five_image_files() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let mut fields = vec![text("section", "facilities"), text("title", "Too many")];
        for _ in 0..6 {
            fields.push(png_file("images", "photo.png"));
        }

        let res = app
            .post_form_with_token(routes::CONTENT, fields, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod singleton_sections {
    use super::*;

    #[tokio::test]
    async fn second_active_hero_record_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_content(&token, "hero", "First hero").await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![text("section", "hero"), text("title", "Second hero")],
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn concurrent_creates_cannot_both_claim_a_singleton_slot() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let first = app.post_form_with_token(
            routes::CONTENT,
            vec![text("section", "footer"), text("title", "Footer A")],
            &token,
        );
        let second = app.post_form_with_token(
            routes::CONTENT,
            vec![text("section", "footer"), text("title", "Footer B")],
            &token,
        );
        let (first, second) = tokio::join!(first, second);

        let mut statuses = [first.status, second.status];
        statuses.sort();
        assert_eq!(
            statuses,
            [201, 409],
            "exactly one create should win: {} / {}",
            first.text,
            second.text
        );
    }

    #[tokio::test]
    async fn inactive_record_does_not_hold_the_slot() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "hero"),
                    text("title", "Draft hero"),
                    text("is_active", "false"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![text("section", "hero"), text("title", "Live hero")],
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn multi_record_sections_allow_several_active_records() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_content(&token, "programs", "Science Stream").await;
        app.create_content(&token, "programs", "Commerce Stream").await;

        let res = app
            .get_without_token(&routes::content_by_section("programs"))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn deactivating_the_holder_frees_the_slot() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app.create_content(&token, "footer", "Old footer").await;

        let res = app
            .put_form_with_token(
                &routes::content(id),
                vec![
                    text("section", "footer"),
                    text("title", "Old footer"),
                    text("is_active", "false"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![text("section", "footer"), text("title", "New footer")],
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_only_active_records_in_order() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "programs"),
                    text("title", "Second"),
                    text("order", "2"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "programs"),
                    text("title", "First"),
                    text("order", "1"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "programs"),
                    text("title", "Hidden"),
                    text("is_active", "false"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);

        let res = app.get_without_token(routes::CONTENT).await;
        assert_eq!(res.status, 200);
        let titles: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn section_filter_narrows_the_listing() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_content(&token, "hero", "Hero").await;
        app.create_content(&token, "about", "About us").await;

        let res = app
            .get_without_token(&routes::content_by_section("about"))
            .await;
        assert_eq!(res.status, 200);
        let records = res.body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "About us");
    }

    #[tokio::test]
    async fn unknown_section_filter_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::content_by_section("sidebar"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn about_endpoint_collects_the_about_page_sections() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_content(&token, "about", "Who we are").await;
        app.create_content(&token, "mission", "Our mission").await;
        app.create_content(&token, "vision", "Our vision").await;
        app.create_content(&token, "values", "Integrity").await;
        app.create_content(&token, "hero", "Hero banner").await;

        let res = app.get_without_token(routes::ABOUT).await;
        assert_eq!(res.status, 200);
        let records = res.body.as_array().unwrap();
        assert_eq!(records.len(), 4);
        assert!(
            records
                .iter()
                .all(|r| r["section"] != "hero"),
            "hero must not appear in the about composite"
        );
    }

    #[tokio::test]
    async fn get_by_id_returns_inactive_records() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "about"),
                    text("title", "Draft"),
                    text("is_active", "false"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let id = res.id();

        let res = app.get_without_token(&routes::content(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["is_active"], false);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::content(999_999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn replaces_scalar_fields_and_clears_omitted_optionals() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "about"),
                    text("title", "Original"),
                    text("subtitle", "Kept at first"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let id = res.id();

        let res = app
            .put_form_with_token(
                &routes::content(id),
                vec![text("section", "about"), text("title", "Updated")],
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Updated");
        assert_eq!(res.body["subtitle"], json!(null));
    }

    #[tokio::test]
    async fn section_cannot_be_changed() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app.create_content(&token, "about", "About").await;

        let res = app
            .put_form_with_token(
                &routes::content(id),
                vec![text("section", "hero"), text("title", "About")],
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn stored_images_survive_when_no_image_fields_are_sent() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "about"),
                    text("title", "Campus"),
                    png_file("images", "gate.png"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let id = res.id();

        let res = app
            .put_form_with_token(
                &routes::content(id),
                vec![text("section", "about"), text("title", "Campus renamed")],
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["images"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unchanged_resubmission_keeps_images_and_advances_updated_at() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "about"),
                    text("title", "Campus"),
                    png_file("images", "gate.png"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.id();
        let images = res.body["images"].clone();
        let created_at = parse_timestamp(&res.body["created_at"]);
        let updated_at = parse_timestamp(&res.body["updated_at"]);

        let res = app
            .put_form_with_token(
                &routes::content(id),
                vec![text("section", "about"), text("title", "Campus")],
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["images"], images);
        assert_eq!(parse_timestamp(&res.body["created_at"]), created_at);
        assert!(
            parse_timestamp(&res.body["updated_at"]) > updated_at,
            "updated_at should advance past {updated_at}, got {}",
            res.body["updated_at"]
        );
    }

    fn parse_timestamp(value: &serde_json::Value) -> chrono::DateTime<chrono::FixedOffset> {
        chrono::DateTime::parse_from_rfc3339(value.as_str().expect("timestamp should be a string"))
            .expect("timestamp should be RFC 3339")
    }

    #[tokio::test]
    async fn new_uploads_append_after_the_kept_list() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "facilities"),
                    text("title", "Labs"),
                    png_file("images", "a.png"),
                    png_file("images", "b.png"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let id = res.id();
        let kept = res.body["images"].clone();

        let res = app
            .put_form_with_token(
                &routes::content(id),
                vec![
                    text("section", "facilities"),
                    text("title", "Labs"),
                    text("existing_images", kept.to_string()),
                    png_file("images", "c.png"),
                    text("caption_0", "New wing"),
                ],
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 3);
        assert_eq!(images[2]["order"], 2);
        assert_eq!(images[2]["caption"], "New wing");
    }

    #[tokio::test]
    async fn uploads_without_the_kept_list_replace_all_images() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "facilities"),
                    text("title", "Labs"),
                    png_file("images", "a.png"),
                    png_file("images", "b.png"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let id = res.id();

        let res = app
            .put_form_with_token(
                &routes::content(id),
                vec![
                    text("section", "facilities"),
                    text("title", "Labs"),
                    png_file("images", "only.png"),
                ],
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["order"], 0);
    }

    #[tokio::test]
    async fn kept_list_alone_removes_unlisted_images() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "facilities"),
                    text("title", "Labs"),
                    png_file("images", "a.png"),
                    png_file("images", "b.png"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let id = res.id();
        let first = res.body["images"][0].clone();

        let res = app
            .put_form_with_token(
                &routes::content(id),
                vec![
                    text("section", "facilities"),
                    text("title", "Labs"),
                    text("existing_images", json!([first]).to_string()),
                ],
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["images"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_existing_images_json_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app.create_content(&token, "about", "About").await;

        let res = app
            .put_form_with_token(
                &routes::content(id),
                vec![
                    text("section", "about"),
                    text("title", "About"),
                    text("existing_images", "not json"),
                ],
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn activating_into_a_held_singleton_slot_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        app.create_content(&token, "hero", "Live hero").await;

        let res = app
            .post_form_with_token(
                routes::CONTENT,
                vec![
                    text("section", "hero"),
                    text("title", "Draft hero"),
                    text("is_active", "false"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        let draft_id = res.id();

        let res = app
            .put_form_with_token(
                &routes::content(draft_id),
                vec![text("section", "hero"), text("title", "Draft hero")],
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn deleted_records_are_gone() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app.create_content(&token, "about", "About").await;

        let res = app.delete_with_token(&routes::content(id), &token).await;
        assert_eq!(res.status, 200);

        let res = app.get_without_token(&routes::content(id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn deleting_an_unknown_record_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .delete_with_token(&routes::content(999_999), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

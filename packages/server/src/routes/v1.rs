use axum::routing::get;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{announcement, auth, contact, content, event, faculty, gallery};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/content", content_routes())
        .nest("/gallery", gallery_routes())
        .nest("/events", event_routes())
        .nest("/faculty", faculty_routes())
        .nest("/announcements", announcement_routes())
        .nest("/contact", contact_routes())
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::login))
        .routes(routes!(auth::me))
}

fn content_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(content::list_content, content::create_content))
        .routes(routes!(content::get_about_sections))
        .routes(routes!(
            content::get_content,
            content::update_content,
            content::delete_content
        ))
        .layer(content::content_body_limit())
}

fn gallery_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(gallery::list_gallery, gallery::create_gallery_item))
        .routes(routes!(
            gallery::update_gallery_item,
            gallery::delete_gallery_item
        ))
        .layer(gallery::gallery_body_limit())
}

fn event_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(event::list_events, event::create_event))
        .routes(routes!(event::update_event, event::delete_event))
        .layer(event::event_body_limit())
}

fn faculty_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(faculty::list_faculty, faculty::create_faculty_member))
        .routes(routes!(
            faculty::update_faculty_member,
            faculty::delete_faculty_member
        ))
        .layer(faculty::faculty_body_limit())
}

fn announcement_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            announcement::list_announcements,
            announcement::create_announcement
        ))
        .routes(routes!(
            announcement::update_announcement,
            announcement::delete_announcement
        ))
}

fn contact_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            contact::submit_contact_message,
            contact::list_contact_messages
        ))
        .routes(routes!(contact::mark_contact_message_read))
        .routes(routes!(contact::delete_contact_message))
}

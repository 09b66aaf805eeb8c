use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[sea_orm(string_value = "photo")]
    Photo,
    #[sea_orm(string_value = "video")]
    Video,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum GalleryCategory {
    #[sea_orm(string_value = "events")]
    Events,
    #[sea_orm(string_value = "campus")]
    Campus,
    #[sea_orm(string_value = "sports")]
    Sports,
    #[sea_orm(string_value = "cultural")]
    Cultural,
    #[sea_orm(string_value = "academic")]
    Academic,
    #[sea_orm(string_value = "other")]
    Other,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gallery_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: Option<String>,

    pub media_type: MediaType,
    pub category: GalleryCategory,

    /// URL of the uploaded photo or video.
    pub media_url: String,
    /// Poster image for videos.
    pub thumbnail_url: Option<String>,

    pub order: i32,
    pub is_active: bool,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    #[sea_orm(string_value = "academic")]
    Academic,
    #[sea_orm(string_value = "sports")]
    Sports,
    #[sea_orm(string_value = "cultural")]
    Cultural,
    #[sea_orm(string_value = "workshop")]
    Workshop,
    #[sea_orm(string_value = "seminar")]
    Seminar,
    #[sea_orm(string_value = "other")]
    Other,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub date: DateTimeUtc,
    /// Display time, free-form (e.g. "10:00 AM").
    pub time: Option<String>,
    pub location: Option<String>,

    pub image_url: Option<String>,
    pub category: EventCategory,

    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

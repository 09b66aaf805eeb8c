use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// JSON-column wrapper for a member's specialization list.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
    utoipa::ToSchema,
)]
pub struct Specializations(pub Vec<String>);

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faculty_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub designation: String,
    pub department: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub specialization: Specializations,

    pub image_url: Option<String>,

    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed vocabulary of page regions a content record can belong to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[sea_orm(string_value = "school-name")]
    SchoolName,
    #[sea_orm(string_value = "hero")]
    Hero,
    #[sea_orm(string_value = "about")]
    About,
    #[sea_orm(string_value = "mission")]
    Mission,
    #[sea_orm(string_value = "vision")]
    Vision,
    #[sea_orm(string_value = "values")]
    Values,
    #[sea_orm(string_value = "facilities")]
    Facilities,
    #[sea_orm(string_value = "achievements")]
    Achievements,
    #[sea_orm(string_value = "programs")]
    Programs,
    #[sea_orm(string_value = "contact")]
    Contact,
    #[sea_orm(string_value = "footer")]
    Footer,
}

impl Section {
    /// The wire tag for this section.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SchoolName => "school-name",
            Self::Hero => "hero",
            Self::About => "about",
            Self::Mission => "mission",
            Self::Vision => "vision",
            Self::Values => "values",
            Self::Facilities => "facilities",
            Self::Achievements => "achievements",
            Self::Programs => "programs",
            Self::Contact => "contact",
            Self::Footer => "footer",
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "school-name" => Some(Self::SchoolName),
            "hero" => Some(Self::Hero),
            "about" => Some(Self::About),
            "mission" => Some(Self::Mission),
            "vision" => Some(Self::Vision),
            "values" => Some(Self::Values),
            "facilities" => Some(Self::Facilities),
            "achievements" => Some(Self::Achievements),
            "programs" => Some(Self::Programs),
            "contact" => Some(Self::Contact),
            "footer" => Some(Self::Footer),
            _ => None,
        }
    }

    /// Whether this section may hold more than one active record.
    ///
    /// Singleton sections back exactly one page region (the hero banner,
    /// the footer, the school name); list sections feed repeated blocks.
    pub fn allows_multiple(&self) -> bool {
        match self {
            Self::SchoolName | Self::Hero | Self::Mission | Self::Vision | Self::Contact
            | Self::Footer => false,
            Self::About | Self::Values | Self::Facilities | Self::Achievements | Self::Programs => {
                true
            }
        }
    }
}

/// One stored media asset owned by a content record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MediaRef {
    /// Location of the asset: a local static path or a remote object URL,
    /// depending on the configured storage backend.
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// Display order within the owning record's image list.
    pub order: i32,
}

/// JSON-column wrapper for the ordered image list.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
    utoipa::ToSchema,
)]
pub struct MediaRefs(pub Vec<MediaRef>);

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub section: Section,

    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    /// Free-form body text. Some sections pack multiple display lines into
    /// this field separated by newlines (e.g. contact: email/phone/address).
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,

    /// Ordered image list, stored inline as JSON.
    pub images: MediaRefs,

    /// Sort key among sibling records of the same section.
    pub order: i32,
    /// Inactive records are hidden from public reads but stay addressable
    /// by id for administrative edits.
    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

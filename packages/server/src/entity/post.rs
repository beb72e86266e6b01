use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub content: String, // rendered HTML
    pub excerpt: String,

    /// Stored as free text; validated against the known category set at the
    /// API boundary only. Display logic must tolerate unknown values.
    pub category: String,

    pub cover_image: Option<String>,
    pub published: bool,
    pub read_time: i32, // in minutes

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Server-generated storage name (`{uuid}.{ext}`).
    pub filename: String,

    /// User-supplied upload filename, kept for display only.
    pub original_name: String,

    pub mime_type: String,

    /// Size in bytes.
    pub size: i64,

    pub caption: Option<String>,

    /// Advisory reference to a post. Deliberately not a database-level
    /// foreign key: existence is checked when the image is created, and the
    /// reference is left dangling when the post is later deleted.
    pub post_id: Option<i32>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

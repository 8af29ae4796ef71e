//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Stable reference issued by the external identity provider
    #[sea_orm(unique)]
    pub external_id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Avatar image URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Cover image URL
    #[sea_orm(nullable)]
    pub cover_url: Option<String>,

    /// Given name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    /// Family name
    #[sea_orm(nullable)]
    pub surname: Option<String>,

    /// Profile description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(nullable)]
    pub city: Option<String>,

    #[sea_orm(nullable)]
    pub school: Option<String>,

    #[sea_orm(nullable)]
    pub work: Option<String>,

    #[sea_orm(nullable)]
    pub website: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::like::Entity")]
    Likes,

    #[sea_orm(has_one = "super::story::Entity")]
    Story,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::story::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Story.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

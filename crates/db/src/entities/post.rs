//! Post entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Publication status of a post.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "ready_to_publish")]
    ReadyToPublish,
    #[sea_orm(string_value = "published")]
    Published,
}

/// Blog post.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "editor_post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    /// Secret key for previewing unpublished posts.
    #[sea_orm(unique)]
    pub uuid: Uuid,

    #[sea_orm(indexed)]
    pub author_id: i64,

    #[sea_orm(indexed)]
    pub category_id: i64,

    /// Short description shown in listings and meta tags.
    pub description: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    /// Storage key of the cover image.
    pub cover_image: Option<String>,

    pub cover_image_credits: Option<String>,

    pub cover_description: Option<String>,

    pub status: PostStatus,

    /// Set once, when the post is first published.
    pub published: Option<DateTimeWithTimeZone>,

    pub created: DateTimeWithTimeZone,

    pub updated: DateTimeWithTimeZone,

    #[sea_orm(default_value = 0)]
    pub views: i64,
}

impl Model {
    /// Whether readers can see this post.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(has_many = "super::post_series::Entity")]
    PostSeries,
    #[sea_orm(has_many = "super::post_gallery_image::Entity")]
    GalleryImages,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::post_series::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostSeries.def()
    }
}

impl Related<super::post_gallery_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GalleryImages.def()
    }
}

impl Related<super::series::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_series::Relation::Series.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_series::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

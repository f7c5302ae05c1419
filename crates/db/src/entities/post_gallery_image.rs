//! Post gallery image entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Image shown in a carousel inside a post body.
///
/// Images sharing a `gallery_key` form one gallery, placed in the body with
/// `[gallery:N]`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "editor_postgalleryimage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(indexed)]
    pub post_id: i64,

    /// Storage key of the image.
    pub image: String,

    #[sea_orm(default_value = "")]
    pub caption: String,

    /// Order in the carousel (lower first).
    #[sea_orm(default_value = 0)]
    pub order: i32,

    /// Gallery number referenced by `[gallery:N]`.
    #[sea_orm(default_value = 1)]
    pub gallery_key: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Content type registry entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registry row mapping an app label and model name to generic references.
///
/// Tagged items (and third-party tables such as audit logs) point at a
/// content type instead of a concrete table, so relabeling a row here moves
/// every generic reference at once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Namespace the model lives in (e.g. `editor`).
    pub app_label: String,

    /// Lowercase model name (e.g. `post`).
    pub model: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tagged_item::Entity")]
    TaggedItems,
}

impl Related<super::tagged_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaggedItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Post category entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Post category. Deleting a category deletes its posts.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "editor_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

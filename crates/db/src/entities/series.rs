//! Series entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named, ordered collection of posts.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "editor_series")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_series::Entity")]
    PostSeries,
}

impl Related<super::post_series::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostSeries.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_series::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_series::Relation::Series.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Account group entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Heading that external accounts are grouped under (e.g. "Social").
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_accountgroup")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Team (about page) repository.

use std::sync::Arc;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use shiftedblog_common::{AppError, AppResult};

use crate::entities::{
    Account, AccountGroup, Person, Skill, account, account_group, person, skill,
};

/// Repository for team members, their skills and accounts.
#[derive(Clone)]
pub struct TeamRepository {
    db: Arc<DatabaseConnection>,
}

impl TeamRepository {
    /// Create a new team repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// The first person by id.
    pub async fn first_person(&self) -> AppResult<Option<person::Model>> {
        Person::find()
            .order_by_asc(person::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Skills of a person in insertion order.
    pub async fn skills_for(&self, person_id: i64) -> AppResult<Vec<skill::Model>> {
        Skill::find()
            .filter(skill::Column::PersonId.eq(person_id))
            .order_by_asc(skill::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Accounts of a person in insertion order.
    pub async fn accounts_for(&self, person_id: i64) -> AppResult<Vec<account::Model>> {
        Account::find()
            .filter(account::Column::PersonId.eq(person_id))
            .order_by_asc(account::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Account groups by id.
    pub async fn account_groups(&self, ids: &[i64]) -> AppResult<Vec<account_group::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        AccountGroup::find()
            .filter(account_group::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

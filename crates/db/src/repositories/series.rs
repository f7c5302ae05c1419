//! Series and post placement repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use shiftedblog_common::{AppError, AppResult};

use crate::entities::{PostSeries, Series, post_series, series};

/// Direction of an adjacency lookup within a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacent {
    /// Greatest position below the current one.
    Previous,
    /// Smallest position above the current one.
    Next,
}

/// Repository for series operations.
#[derive(Clone)]
pub struct SeriesRepository {
    db: Arc<DatabaseConnection>,
}

impl SeriesRepository {
    /// Create a new series repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Series Operations ====================

    /// Find series by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<series::Model>> {
        Series::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all series by name.
    pub async fn list(&self) -> AppResult<Vec<series::Model>> {
        Series::find()
            .order_by_asc(series::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a series.
    pub async fn create(&self, name: String) -> AppResult<series::Model> {
        series::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a series. Its placements go with it, its posts stay.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        Series::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ==================== Placement Operations ====================

    /// Find a placement by ID.
    pub async fn find_placement_by_id(&self, id: i64) -> AppResult<Option<post_series::Model>> {
        PostSeries::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the placement of a post in a series.
    pub async fn find_placement(
        &self,
        post_id: i64,
        series_id: i64,
    ) -> AppResult<Option<post_series::Model>> {
        PostSeries::find()
            .filter(post_series::Column::PostId.eq(post_id))
            .filter(post_series::Column::SeriesId.eq(series_id))
            .order_by_asc(post_series::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The oldest placement of a post that has a position.
    pub async fn first_ordered_placement(
        &self,
        post_id: i64,
    ) -> AppResult<Option<post_series::Model>> {
        PostSeries::find()
            .filter(post_series::Column::PostId.eq(post_id))
            .filter(post_series::Column::OrderPosition.is_not_null())
            .order_by_asc(post_series::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the placement holding a position in a series.
    pub async fn find_by_position(
        &self,
        series_id: i64,
        position: i32,
    ) -> AppResult<Option<post_series::Model>> {
        PostSeries::find()
            .filter(post_series::Column::SeriesId.eq(series_id))
            .filter(post_series::Column::OrderPosition.eq(position))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Placements of a series in order. Unordered placements come last.
    pub async fn placements(&self, series_id: i64) -> AppResult<Vec<post_series::Model>> {
        PostSeries::find()
            .filter(post_series::Column::SeriesId.eq(series_id))
            .order_by_asc(post_series::Column::OrderPosition)
            .order_by_asc(post_series::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Candidates for the neighbor of `position`, closest first.
    ///
    /// Returns at most two placements so the caller can detect a duplicated
    /// position. Ties are broken by placement id: highest first for
    /// [`Adjacent::Previous`], lowest first for [`Adjacent::Next`].
    pub async fn adjacent(
        &self,
        series_id: i64,
        position: i32,
        direction: Adjacent,
    ) -> AppResult<Vec<post_series::Model>> {
        let query = PostSeries::find().filter(post_series::Column::SeriesId.eq(series_id));

        let query = match direction {
            Adjacent::Previous => query
                .filter(post_series::Column::OrderPosition.lt(position))
                .order_by_desc(post_series::Column::OrderPosition)
                .order_by_desc(post_series::Column::Id),
            Adjacent::Next => query
                .filter(post_series::Column::OrderPosition.gt(position))
                .order_by_asc(post_series::Column::OrderPosition)
                .order_by_asc(post_series::Column::Id),
        };

        query
            .limit(2)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Place a post in a series.
    pub async fn create_placement(
        &self,
        post_id: i64,
        series_id: i64,
        order_position: Option<i32>,
    ) -> AppResult<post_series::Model> {
        post_series::ActiveModel {
            post_id: Set(post_id),
            series_id: Set(series_id),
            order_position: Set(order_position),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Change the position of a placement.
    pub async fn set_position(
        &self,
        placement: post_series::Model,
        order_position: Option<i32>,
    ) -> AppResult<post_series::Model> {
        let mut active: post_series::ActiveModel = placement.into();
        active.order_position = Set(order_position);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a placement.
    pub async fn delete_placement(&self, id: i64) -> AppResult<()> {
        PostSeries::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

//! Series service.
//!
//! Resolves the previous and next post of a post within a series and manages
//! series placements from the editor.

use serde::{Deserialize, Serialize};
use shiftedblog_common::{AppError, AppResult};
use shiftedblog_db::entities::{post, post_series, series};
use shiftedblog_db::repositories::{Adjacent, PostRepository, SeriesRepository};
use tracing::{error, warn};
use validator::Validate;

/// Input for creating a series.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSeriesInput {
    #[validate(length(min = 1, max = 250))]
    pub name: String,
}

/// Input for placing a post in a series.
#[derive(Debug, Deserialize, Validate)]
pub struct PlacePostInput {
    pub post_id: i64,
    /// Position within the series. Unordered placements have none.
    #[validate(range(min = 0))]
    #[serde(default)]
    pub order_position: Option<i32>,
}

/// Input for moving a placement.
#[derive(Debug, Deserialize, Validate)]
pub struct SetPositionInput {
    #[validate(range(min = 0))]
    pub order_position: Option<i32>,
}

/// Series links shown on a post page.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesNavigation {
    pub series: series::Model,
    pub position: i32,
    pub previous: Option<post::Model>,
    pub next: Option<post::Model>,
}

/// Service for series.
#[derive(Clone)]
pub struct SeriesService {
    series_repo: SeriesRepository,
    post_repo: PostRepository,
}

impl SeriesService {
    /// Create a new series service.
    #[must_use]
    pub const fn new(series_repo: SeriesRepository, post_repo: PostRepository) -> Self {
        Self {
            series_repo,
            post_repo,
        }
    }

    // ==================== Navigation ====================

    /// Position of a post in a series, if it has one.
    pub async fn get_series_position(&self, post_id: i64, series_id: i64) -> Option<i32> {
        match self.series_repo.find_placement(post_id, series_id).await {
            Ok(placement) => placement.and_then(|p| p.order_position),
            Err(e) => {
                warn!(error = %e, post_id, series_id, "Series position lookup failed");
                None
            }
        }
    }

    /// The post right before `post_id` in a series.
    pub async fn get_previous_post_in_series(
        &self,
        post_id: i64,
        series_id: i64,
    ) -> Option<post::Model> {
        let position = self.get_series_position(post_id, series_id).await?;
        self.neighbor(series_id, position, Adjacent::Previous).await
    }

    /// The post right after `post_id` in a series.
    pub async fn get_next_post_in_series(
        &self,
        post_id: i64,
        series_id: i64,
    ) -> Option<post::Model> {
        let position = self.get_series_position(post_id, series_id).await?;
        self.neighbor(series_id, position, Adjacent::Next).await
    }

    /// Navigation for a post page.
    ///
    /// Uses the oldest placement of the post that has a position. Neighbors
    /// that are not published are left out.
    pub async fn navigation_for(&self, post: &post::Model) -> Option<SeriesNavigation> {
        let placement = match self.series_repo.first_ordered_placement(post.id).await {
            Ok(placement) => placement?,
            Err(e) => {
                warn!(error = %e, post_id = post.id, "Series placement lookup failed");
                return None;
            }
        };
        let position = placement.order_position?;

        let series = match self.series_repo.find_by_id(placement.series_id).await {
            Ok(series) => series?,
            Err(e) => {
                warn!(error = %e, series_id = placement.series_id, "Series lookup failed");
                return None;
            }
        };

        let previous = self
            .neighbor(series.id, position, Adjacent::Previous)
            .await
            .filter(post::Model::is_published);
        let next = self
            .neighbor(series.id, position, Adjacent::Next)
            .await
            .filter(post::Model::is_published);

        Some(SeriesNavigation {
            series,
            position,
            previous,
            next,
        })
    }

    async fn neighbor(
        &self,
        series_id: i64,
        position: i32,
        direction: Adjacent,
    ) -> Option<post::Model> {
        match self.try_neighbor(series_id, position, direction).await {
            Ok(post) => post,
            Err(e) => {
                warn!(error = %e, series_id, position, ?direction, "Series neighbor lookup failed");
                None
            }
        }
    }

    async fn try_neighbor(
        &self,
        series_id: i64,
        position: i32,
        direction: Adjacent,
    ) -> AppResult<Option<post::Model>> {
        let candidates = self
            .series_repo
            .adjacent(series_id, position, direction)
            .await?;

        let Some(closest) = candidates.first() else {
            return Ok(None);
        };

        if let Some(duplicate) = candidates
            .get(1)
            .filter(|other| other.order_position == closest.order_position)
        {
            error!(
                series_id,
                order_position = ?closest.order_position,
                chosen = closest.id,
                duplicate = duplicate.id,
                "Duplicate position in series"
            );
        }

        self.post_repo.find_by_id(closest.post_id).await
    }

    // ==================== Editor Operations ====================

    /// List all series.
    pub async fn list(&self) -> AppResult<Vec<series::Model>> {
        self.series_repo.list().await
    }

    /// Create a series.
    pub async fn create_series(&self, input: CreateSeriesInput) -> AppResult<series::Model> {
        input.validate()?;
        self.series_repo.create(input.name).await
    }

    /// Delete a series.
    pub async fn delete_series(&self, series_id: i64) -> AppResult<()> {
        self.get_series(series_id).await?;
        self.series_repo.delete(series_id).await
    }

    /// Placements of a series in order.
    pub async fn placements(&self, series_id: i64) -> AppResult<Vec<post_series::Model>> {
        self.get_series(series_id).await?;
        self.series_repo.placements(series_id).await
    }

    /// Place a post in a series.
    pub async fn place_post(
        &self,
        series_id: i64,
        input: PlacePostInput,
    ) -> AppResult<post_series::Model> {
        input.validate()?;
        self.get_series(series_id).await?;
        self.post_repo.get_by_id(input.post_id).await?;

        if self
            .series_repo
            .find_placement(input.post_id, series_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Post {} is already in series {series_id}",
                input.post_id
            )));
        }

        if let Some(position) = input.order_position {
            self.ensure_position_free(series_id, position, None).await?;
        }

        self.series_repo
            .create_placement(input.post_id, series_id, input.order_position)
            .await
    }

    /// Move a placement to another position.
    pub async fn set_position(
        &self,
        series_id: i64,
        placement_id: i64,
        input: SetPositionInput,
    ) -> AppResult<post_series::Model> {
        input.validate()?;
        let placement = self.get_placement(series_id, placement_id).await?;

        if let Some(position) = input.order_position {
            self.ensure_position_free(series_id, position, Some(placement.id))
                .await?;
        }

        self.series_repo
            .set_position(placement, input.order_position)
            .await
    }

    /// Take a post out of a series.
    pub async fn remove_post(&self, series_id: i64, placement_id: i64) -> AppResult<()> {
        let placement = self.get_placement(series_id, placement_id).await?;
        self.series_repo.delete_placement(placement.id).await
    }

    async fn get_series(&self, series_id: i64) -> AppResult<series::Model> {
        self.series_repo
            .find_by_id(series_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Series not found: {series_id}")))
    }

    async fn get_placement(
        &self,
        series_id: i64,
        placement_id: i64,
    ) -> AppResult<post_series::Model> {
        self.series_repo
            .find_placement_by_id(placement_id)
            .await?
            .filter(|p| p.series_id == series_id)
            .ok_or_else(|| AppError::NotFound(format!("Placement not found: {placement_id}")))
    }

    async fn ensure_position_free(
        &self,
        series_id: i64,
        position: i32,
        except: Option<i64>,
    ) -> AppResult<()> {
        match self.series_repo.find_by_position(series_id, position).await? {
            Some(taken) if Some(taken.id) != except => Err(AppError::Conflict(format!(
                "Position {position} is taken in series {series_id}"
            ))),
            _ => Ok(()),
        }
    }
}

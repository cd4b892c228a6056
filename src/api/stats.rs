//! Admin dashboard statistics endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::{Counts, UserStatistics};
use crate::AppState;

/// GET /api/stats - User and item counts.
pub async fn get_counts(State(state): State<AppState>) -> ApiResult<Counts> {
    let users = state.repo.count_users().await?;
    let items = state.repo.count_items().await?;
    success(Counts { users, items })
}

/// GET /api/stats/users - Items added and bought per user.
pub async fn user_statistics(State(state): State<AppState>) -> ApiResult<Vec<UserStatistics>> {
    let stats = state.repo.user_statistics().await?;
    success(stats)
}

//! Item API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    calendar_date, BatchDeleteOutcome, BatchDeleteRequest, CreateItemRequest, FutureKind, Item,
    MarkPurchasedRequest, ReplayItemRequest, Schedule,
};
use crate::AppState;

/// Query parameters for the active list.
#[derive(Debug, Deserialize)]
pub struct ActiveListQuery {
    /// Reference date (YYYY-MM-DD); defaults to today.
    #[serde(default)]
    pub date: Option<String>,
}

/// Query parameters for the future list.
#[derive(Debug, Deserialize)]
pub struct FutureListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// POST /api/items - Create a new item.
pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> ApiResult<Item> {
    // Validate required fields
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Item name is required".to_string()));
    }
    if request.quantity.trim().is_empty() {
        return Err(AppError::Validation("Item quantity is required".to_string()));
    }
    if request.added_by.trim().is_empty() {
        return Err(AppError::Validation("addedBy is required".to_string()));
    }

    let item = state.repo.create_item(&request).await?;
    success(item)
}

/// GET /api/items - List all items.
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Vec<Item>> {
    let items = state.repo.list_items().await?;
    success(items)
}

/// GET /api/items/active - Items due for purchase on the reference date.
///
/// The date is evaluated freshly per call from the wall clock when not
/// supplied; there is no background scheduler.
pub async fn active_items(
    State(state): State<AppState>,
    Query(query): Query<ActiveListQuery>,
) -> ApiResult<Vec<Item>> {
    let date = match &query.date {
        Some(raw) => calendar_date::parse(raw).map_err(AppError::Validation)?,
        None => Utc::now().date_naive(),
    };

    let items = state.repo.active_items(date).await?;
    success(items)
}

/// GET /api/items/future?type=regular|specific - Future schedule views.
pub async fn future_items(
    State(state): State<AppState>,
    Query(query): Query<FutureListQuery>,
) -> ApiResult<Vec<Item>> {
    let kind = query
        .kind
        .as_deref()
        .and_then(FutureKind::from_str)
        .ok_or_else(|| {
            AppError::Validation("Type must be \"regular\" or \"specific\"".to_string())
        })?;

    let items = state.repo.future_items(kind).await?;
    success(items)
}

/// GET /api/items/history - Purchased items, most recent purchase first.
pub async fn history_items(State(state): State<AppState>) -> ApiResult<Vec<Item>> {
    let items = state.repo.history_items().await?;
    success(items)
}

/// GET /api/items/:id - Get a single item.
pub async fn get_item(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Item> {
    let item = state
        .repo
        .get_item(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))?;
    success(item)
}

/// PUT /api/items/:id/purchased - Mark an item purchased or put it back.
///
/// Any household member may mark any item; there is no ownership check.
pub async fn mark_purchased(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MarkPurchasedRequest>,
) -> ApiResult<Item> {
    let purchased_by = request
        .purchased_by
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    // A purchase always records who made it; a purchased item without a
    // buyer would break the history view.
    if request.is_purchased && purchased_by.is_none() {
        return Err(AppError::Validation(
            "purchasedBy is required when marking an item purchased".to_string(),
        ));
    }

    let item = state
        .repo
        .set_purchased(&id, request.is_purchased, purchased_by)
        .await?;
    success(item)
}

/// DELETE /api/items/:id - Delete an item, returning it for confirmation.
pub async fn delete_item(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Item> {
    let item = state.repo.delete_item(&id).await?;
    success(item)
}

/// DELETE /api/items - Delete several items with independent outcomes.
///
/// Deliberately not a transaction: each delete stands alone and partial
/// failure is reported per item.
pub async fn batch_delete_items(
    State(state): State<AppState>,
    Json(request): Json<BatchDeleteRequest>,
) -> ApiResult<Vec<BatchDeleteOutcome>> {
    if request.ids.is_empty() {
        return Err(AppError::Validation("No item ids provided".to_string()));
    }

    let mut outcomes = Vec::with_capacity(request.ids.len());
    for id in &request.ids {
        let outcome = match state.repo.delete_item(id).await {
            Ok(_) => BatchDeleteOutcome {
                id: id.clone(),
                deleted: true,
                error: None,
            },
            Err(e) => BatchDeleteOutcome {
                id: id.clone(),
                deleted: false,
                error: Some(e.error_code().to_string()),
            },
        };
        outcomes.push(outcome);
    }

    success(outcomes)
}

/// POST /api/items/replay - Re-add a history item to the active list.
///
/// Creates a fresh unscheduled item owned by the requester; the history
/// record it was copied from is never mutated.
pub async fn replay_item(
    State(state): State<AppState>,
    Json(request): Json<ReplayItemRequest>,
) -> ApiResult<Item> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Item name is required".to_string()));
    }
    if request.quantity.trim().is_empty() {
        return Err(AppError::Validation("Item quantity is required".to_string()));
    }
    if request.requested_by.trim().is_empty() {
        return Err(AppError::Validation("requestedBy is required".to_string()));
    }

    let create = CreateItemRequest {
        name: request.name.clone(),
        quantity: request.quantity.clone(),
        added_by: request.requested_by.clone(),
        description: request.description.clone(),
        schedule: Some(Schedule::None),
    };

    let item = state.repo.create_item(&create).await?;
    success(item)
}

//! User account API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::auth;
use crate::errors::AppError;
use crate::models::{ChangePasswordRequest, LoginRequest, RegisterRequest, User};
use crate::AppState;

/// POST /api/users - Register a new user.
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<User> {
    if request.user_name.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "User name and password are required".to_string(),
        ));
    }

    if state
        .repo
        .get_user_by_name(&request.user_name)
        .await?
        .is_some()
    {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let user = state.repo.create_user(&request).await?;
    tracing::info!(user = %user.user_name, "registered new user");
    success(user)
}

/// POST /api/users/login - Verify credentials.
pub async fn login_user(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<User> {
    if request.user_name.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "User name and password are required".to_string(),
        ));
    }

    let Some(user) = state.repo.get_user_by_name(&request.user_name).await? else {
        return Err(AppError::Validation("User does not exist".to_string()));
    };

    if !auth::verify_password(&request.password, &user.password) {
        return Err(AppError::Validation("Invalid password".to_string()));
    }

    success(user)
}

/// PUT /api/users/password - Change a user's password.
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    if request.user_name.trim().is_empty() || request.new_password.is_empty() {
        return Err(AppError::Validation(
            "User name and new password are required".to_string(),
        ));
    }

    state
        .repo
        .change_password(&request.user_name, &request.new_password)
        .await?;
    success(())
}

/// GET /api/users - List all users. Passwords never leave the server.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.repo.list_users().await?;
    success(users)
}

/// DELETE /api/users/:id - Delete a user, returning them for confirmation.
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let user = state.repo.delete_user(&id).await?;
    success(user)
}

//! Household user model.

use serde::{Deserialize, Serialize};

/// A household member who can add and buy items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub user_name: String,
    /// Stored as received; never sent back out.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub joined_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for registering a new user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub password: String,
}

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

/// Request body for changing a password.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub user_name: String,
    pub new_password: String,
}

/// Per-user activity row for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub username: String,
    pub items_added: i64,
    pub items_bought: i64,
}

/// Collection counts for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub users: i64,
    pub items: i64,
}

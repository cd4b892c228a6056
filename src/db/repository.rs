//! Database repository: item lifecycle writes and the four read views.

use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeSet;

use crate::errors::AppError;
use crate::models::{CreateItemRequest, FutureKind, Item, RegisterRequest, Schedule, User, UserStatistics, Weekday};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== ITEM LIFECYCLE ====================

    /// Create a new item. The caller has already validated required fields.
    pub async fn create_item(&self, request: &CreateItemRequest) -> Result<Item, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let description = request.description.clone().unwrap_or_default();
        let schedule = request.schedule.clone().unwrap_or_default();
        let (regular_days, specific_date) = schedule_columns(&schedule);

        sqlx::query(
            r#"INSERT INTO items (
                id, name, quantity, added_by, description,
                is_purchased, purchased_by, date_bought,
                schedule_type, regular_days, specific_date,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, 0, NULL, NULL, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.quantity)
        .bind(&request.added_by)
        .bind(&description)
        .bind(schedule.type_name())
        .bind(&regular_days)
        .bind(&specific_date)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Item {
            id,
            name: request.name.clone(),
            quantity: request.quantity.clone(),
            added_by: request.added_by.clone(),
            description,
            is_purchased: false,
            purchased_by: None,
            date_bought: None,
            schedule,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get an item by ID.
    pub async fn get_item(&self, id: &str) -> Result<Option<Item>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, name, quantity, added_by, description,
                      is_purchased, purchased_by, date_bought,
                      schedule_type, regular_days, specific_date,
                      created_at, updated_at
               FROM items WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(item_from_row))
    }

    /// Set an item's purchased state.
    ///
    /// Marking purchased stamps `purchased_by`/`date_bought`; re-marking an
    /// already purchased item simply overwrites them. Unmarking clears both.
    /// Last writer wins; no conflict is detected between concurrent callers.
    pub async fn set_purchased(
        &self,
        id: &str,
        purchased: bool,
        purchased_by: Option<&str>,
    ) -> Result<Item, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = if purchased {
            sqlx::query(
                "UPDATE items SET is_purchased = 1, purchased_by = ?, date_bought = ?, updated_at = ? WHERE id = ?",
            )
            .bind(purchased_by)
            .bind(&now)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query(
                "UPDATE items SET is_purchased = 0, purchased_by = NULL, date_bought = NULL, updated_at = ? WHERE id = ?",
            )
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?
        };

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item {} not found", id)));
        }

        self.get_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
    }

    /// Delete an item, returning it for confirmation.
    pub async fn delete_item(&self, id: &str) -> Result<Item, AppError> {
        let existing = self
            .get_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))?;

        sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(existing)
    }

    // ==================== ITEM VIEWS ====================

    /// List every item in insertion order.
    pub async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, name, quantity, added_by, description,
                      is_purchased, purchased_by, date_bought,
                      schedule_type, regular_days, specific_date,
                      created_at, updated_at
               FROM items ORDER BY rowid"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    /// Items due for purchase on `date`. The whole collection is fetched and
    /// filtered in memory; fine at household scale, a known limit beyond it.
    pub async fn active_items(&self, date: NaiveDate) -> Result<Vec<Item>, AppError> {
        let items = self.list_items().await?;
        Ok(items.into_iter().filter(|i| i.is_active_on(date)).collect())
    }

    /// Unpurchased items under schedule management, newest-created-first.
    /// Overlaps with the active list on purpose: a Monday item due today is
    /// still managed from the regular view.
    pub async fn future_items(&self, kind: FutureKind) -> Result<Vec<Item>, AppError> {
        let mut items: Vec<Item> = self
            .list_items()
            .await?
            .into_iter()
            .filter(|i| match kind {
                FutureKind::Regular => i.is_future_regular(),
                FutureKind::Specific => i.is_future_specific(),
            })
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Purchased items, most recently updated first. `updated_at` tracks the
    /// purchase since marking is the last write an item sees.
    pub async fn history_items(&self) -> Result<Vec<Item>, AppError> {
        let mut items: Vec<Item> = self
            .list_items()
            .await?
            .into_iter()
            .filter(|i| i.is_history())
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(items)
    }

    // ==================== USER OPERATIONS ====================

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(
            "SELECT id, user_name, password, joined_at, created_at, updated_at FROM users ORDER BY user_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Look up a user by name.
    pub async fn get_user_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, user_name, password, joined_at, created_at, updated_at FROM users WHERE user_name = ?",
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create a new user. The caller has already checked for duplicates.
    pub async fn create_user(&self, request: &RegisterRequest) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO users (id, user_name, password, joined_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.user_name)
        .bind(&request.password)
        .bind(&now)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            user_name: request.user_name.clone(),
            password: request.password.clone(),
            joined_at: now.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Change a user's password.
    pub async fn change_password(
        &self,
        user_name: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE users SET password = ?, updated_at = ? WHERE user_name = ?",
        )
        .bind(new_password)
        .bind(&now)
        .bind(user_name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_name)));
        }
        Ok(())
    }

    /// Delete a user, returning them for confirmation.
    pub async fn delete_user(&self, id: &str) -> Result<User, AppError> {
        let row = sqlx::query(
            "SELECT id, user_name, password, joined_at, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let existing = row
            .as_ref()
            .map(user_from_row)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(existing)
    }

    // ==================== STATISTICS ====================

    /// Count all users.
    pub async fn count_users(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Count all items.
    pub async fn count_items(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Per-user added/bought totals for the dashboard.
    pub async fn user_statistics(&self) -> Result<Vec<UserStatistics>, AppError> {
        let rows = sqlx::query(
            r#"SELECT u.user_name,
                      (SELECT COUNT(*) FROM items i WHERE i.added_by = u.user_name) AS items_added,
                      (SELECT COUNT(*) FROM items i
                        WHERE i.is_purchased = 1 AND i.purchased_by = u.user_name) AS items_bought
               FROM users u
               ORDER BY u.user_name"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserStatistics {
                username: row.get("user_name"),
                items_added: row.get("items_added"),
                items_bought: row.get("items_bought"),
            })
            .collect())
    }
}

// Helper functions for row conversion

fn schedule_columns(schedule: &Schedule) -> (Option<String>, Option<String>) {
    match schedule {
        Schedule::None => (None, None),
        Schedule::Regular { days } => (
            Some(serde_json::to_string(days).unwrap_or_default()),
            None,
        ),
        Schedule::Specific { date } => (None, Some(date.format("%Y-%m-%d").to_string())),
    }
}

fn item_from_row(row: &sqlx::sqlite::SqliteRow) -> Item {
    let is_purchased: i32 = row.get("is_purchased");
    let schedule_type: String = row.get("schedule_type");
    let regular_days: Option<String> = row.get("regular_days");
    let specific_date: Option<String> = row.get("specific_date");

    let schedule = match schedule_type.as_str() {
        "regular" => Schedule::Regular {
            days: regular_days.map(|s| parse_days(&s)).unwrap_or_default(),
        },
        "specific" => specific_date
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
            .map(|date| Schedule::Specific { date })
            .unwrap_or_default(),
        _ => Schedule::None,
    };

    Item {
        id: row.get("id"),
        name: row.get("name"),
        quantity: row.get("quantity"),
        added_by: row.get("added_by"),
        description: row.get("description"),
        is_purchased: is_purchased != 0,
        purchased_by: row.get("purchased_by"),
        date_bought: row.get("date_bought"),
        schedule,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        user_name: row.get("user_name"),
        password: row.get("password"),
        joined_at: row.get("joined_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn parse_days(s: &str) -> BTreeSet<Weekday> {
    serde_json::from_str(s).unwrap_or_default()
}

//! Shared Grocery List Backend
//!
//! A REST backend with SQLite persistence for a household shopping list
//! shared between a mobile client and an admin dashboard.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Grocery List Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState { repo };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Items
        .route("/items", get(api::list_items))
        .route("/items", post(api::create_item))
        .route("/items", delete(api::batch_delete_items))
        .route("/items/active", get(api::active_items))
        .route("/items/future", get(api::future_items))
        .route("/items/history", get(api::history_items))
        .route("/items/replay", post(api::replay_item))
        .route("/items/{id}", get(api::get_item))
        .route("/items/{id}", delete(api::delete_item))
        .route("/items/{id}/purchased", put(api::mark_purchased))
        // Users
        .route("/users", get(api::list_users))
        .route("/users", post(api::register_user))
        .route("/users/login", post(api::login_user))
        .route("/users/password", put(api::change_password))
        .route("/users/{id}", delete(api::delete_user))
        // Dashboard statistics
        .route("/stats", get(api::get_counts))
        .route("/stats/users", get(api::user_statistics));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

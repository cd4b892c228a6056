//! Configuration module for the grocery backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("GROCERY_DB_PATH")
            .unwrap_or_else(|_| "./data/grocery.sqlite".to_string())
            .into();

        let bind_addr = env::var("GROCERY_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5200".to_string())
            .parse()
            .expect("Invalid GROCERY_BIND_ADDR format");

        let log_level = env::var("GROCERY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            db_path,
            bind_addr,
            log_level,
        }
    }
}

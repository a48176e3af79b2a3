use std::env;

/// Data-layer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "shortstay.db")
    pub sqlite_path: String,
    /// Default result cap for list queries (default: 10)
    pub search_result_limit: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "shortstay.db")
    /// - `SEARCH_RESULT_LIMIT` - Default result cap for list queries (default: 10)
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "shortstay.db".to_string()),
            search_result_limit: env::var("SEARCH_RESULT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

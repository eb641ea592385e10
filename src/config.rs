//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8000
/// - `MAX_PAGE_SIZE` (optional): largest accepted `page_size`, defaults to 100
/// - `DEFAULT_PAGE_SIZE` (optional): `page_size` when omitted, defaults to 50
/// - `RATE_LIMIT_TOKEN_CREATE` (optional): token-creation requests per window, defaults to 5
/// - `RATE_LIMIT_REVIEW_SUBMIT` (optional): review submissions per window, defaults to 30
/// - `RATE_LIMIT_DEFAULT` (optional): requests per window for all other routes, defaults to 10
/// - `RATE_LIMIT_WINDOW_SECS` (optional): fixed-window length in seconds, defaults to 60
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_token_create_limit")]
    pub rate_limit_token_create: u32,

    #[serde(default = "default_review_submit_limit")]
    pub rate_limit_review_submit: u32,

    #[serde(default = "default_route_limit")]
    pub rate_limit_default: u32,

    #[serde(default = "default_window_secs")]
    pub rate_limit_window_secs: u64,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8000
}

fn default_max_page_size() -> u32 {
    100
}

fn default_page_size() -> u32 {
    50
}

fn default_token_create_limit() -> u32 {
    5
}

fn default_review_submit_limit() -> u32 {
    30
}

fn default_route_limit() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    60
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }
}

impl Default for Config {
    /// Defaults used by tests and in-memory runs where no database is needed.
    fn default() -> Self {
        Self {
            database_url: String::new(),
            server_port: default_port(),
            max_page_size: default_max_page_size(),
            default_page_size: default_page_size(),
            rate_limit_token_create: default_token_create_limit(),
            rate_limit_review_submit: default_review_submit_limit(),
            rate_limit_default: default_route_limit(),
            rate_limit_window_secs: default_window_secs(),
        }
    }
}

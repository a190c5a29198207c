//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Default language code used when a request carries no locale
    /// (default: "en").
    pub default_language: String,

    /// Path to the element definitions file (default: ./elements.toml).
    pub element_definitions_path: PathBuf,

    /// Path to the navigation file. When None, the built-in entries are
    /// used.
    pub navigation_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let default_language = env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "en".to_string());

        let element_definitions_path = env::var("ELEMENT_DEFINITIONS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./elements.toml"));

        let navigation_path = env::var("NAVIGATION_PATH").map(PathBuf::from).ok();

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            default_language,
            element_definitions_path,
            navigation_path,
        })
    }
}

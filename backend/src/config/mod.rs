//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the store backend, database URL, server port, and JWT signing secret.
//! Configuration is loaded once at startup and injected where needed.

use anyhow::{Context, Result, bail};
use std::env;

/// Which persistence backend the stores should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process maps, lost on shutdown. The default.
    Memory,
    /// SQLite via sqlx, requires `DATABASE_URL`.
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub server_port: u16,
    pub demo_user_email: Option<String>,
    pub demo_user_password: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "sqlite" => StoreBackend::Sqlite,
            other => bail!("STORE_BACKEND must be 'memory' or 'sqlite', got '{other}'"),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Sqlite && database_url.is_none() {
            bail!("DATABASE_URL not set but STORE_BACKEND is 'sqlite'");
        }

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

        // Sessions last 2 hours unless overridden.
        let jwt_expires_in_seconds = env::var("JWT_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| "7200".to_string())
            .parse::<u64>()
            .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let demo_user_email = env::var("DEMO_USER_EMAIL").ok();
        let demo_user_password = env::var("DEMO_USER_PASSWORD").ok();

        Ok(Config {
            store_backend,
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in_seconds,
            server_port,
            demo_user_email,
            demo_user_password,
        })
    }
}

//! Server configuration from environment variables.
//!
//!   CATALOG_BIND_ADDR           - listen address (default: 0.0.0.0:8080)
//!   DATABASE_URL                - Postgres connection string (unset: in-memory store)
//!   CATALOG_DB_MAX_CONNECTIONS  - pool size (default: 10)
//!   CATALOG_RUN_MIGRATIONS      - apply embedded migrations at startup (default: true)

use std::str::FromStr;

use anyhow::{Context, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            bind_addr: get("CATALOG_BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: get("DATABASE_URL"),
            max_connections: parse_or(
                "CATALOG_DB_MAX_CONNECTIONS",
                get("CATALOG_DB_MAX_CONNECTIONS"),
                defaults.max_connections,
            )?,
            run_migrations: parse_or(
                "CATALOG_RUN_MIGRATIONS",
                get("CATALOG_RUN_MIGRATIONS"),
                defaults.run_migrations,
            )?,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: '{v}'")),
        None => Ok(default),
    }
}

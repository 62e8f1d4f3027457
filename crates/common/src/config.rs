//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Provider-specific settings
//! (identity provider credentials) live next to the provider in its own crate.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Where cards, transactions, sessions and pending flows are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    Memory,
    Postgres,
}

impl std::str::FromStr for StoreProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreProvider::Memory),
            "postgres" | "postgresql" => Ok(StoreProvider::Postgres),
            other => Err(anyhow::anyhow!(
                "Unknown store provider: {}. Supported providers: memory, postgres",
                other
            )),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Persistence backend for the finance repository
    pub store_provider: StoreProvider,

    /// Database connection URL, required when `store_provider` is postgres
    pub database_url: Option<String>,

    /// Base URL of the QuickChart rendering service
    pub quickchart_url: String,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    #[mutants::skip] // Debug formatting only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("store_provider", &self.store_provider)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("quickchart_url", &self.quickchart_url)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let store_provider: StoreProvider = env::var("STORE_PROVIDER")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        if store_provider == StoreProvider::Postgres && database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL is required when STORE_PROVIDER=postgres"
            ));
        }

        let config = Self {
            store_provider,
            database_url,
            quickchart_url: env::var("QUICKCHART_URL")
                .unwrap_or_else(|_| "https://quickchart.io".to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "walletbot=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}

use anyhow::{bail, Result};
use serde::Deserialize;
use crate::config::env::{self, EnvKey};

pub const DEFAULT_MAX_PAGE_LIMIT: u64 = 100;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Upper bound applied to the `limit` of paginated listings.
    pub max_page_limit: u64,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000)?,
            database_url: env::get(EnvKey::DatabaseUrl)?,
            db_max_connections: env::get_parsed(EnvKey::DbMaxConnections, 20)?,
            max_page_limit: env::get_parsed(EnvKey::MaxPageLimit, DEFAULT_MAX_PAGE_LIMIT)?,
        }
        .validated()
    }

    fn validated(self) -> Result<Self> {
        if self.max_page_limit < 1 {
            bail!("MAX_PAGE_LIMIT must be at least 1");
        }
        if self.db_max_connections < 1 {
            bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        Ok(self)
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            server_port: 0,
            database_url: String::new(),
            db_max_connections: 1,
            max_page_limit: DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}

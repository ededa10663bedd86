use anyhow::{anyhow, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    DbMaxConnections,
    MaxPageLimit,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::DbMaxConnections => "DB_MAX_CONNECTIONS",
            EnvKey::MaxPageLimit => "MAX_PAGE_LIMIT",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String> {
    let name = key.as_str();
    env::var(name).map_err(|_| anyhow!("{} must be set", name))
}

/// Reads and parses `key`, falling back to `default` only when it is unset.
pub fn get_parsed<T>(key: EnvKey, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let name = key.as_str();
    parse_value(name, env::var(name).ok(), default)
}

fn parse_value<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
    }
}

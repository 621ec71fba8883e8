use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;

/// Resolved settings for a Postgres connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: Option<String>,
    pub connect_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            user: None,
            password: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            name: None,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Read `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT` and `DB_NAME` from
    /// the process environment.
    pub fn from_env() -> Result<DbConfig> {
        DbConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source.  Empty values count as
    /// missing.
    pub fn from_lookup<F>(lookup: F) -> Result<DbConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let port = match get("DB_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| Error::connection(format!("invalid DB_PORT {}: {}", port, e)))?,
            None => DEFAULT_PORT,
        };
        Ok(DbConfig {
            user: get("DB_USER"),
            password: get("DB_PASSWORD"),
            host: get("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            name: get("DB_NAME"),
            ..DbConfig::default()
        })
    }

    /// Both a user and a database name are needed before trying to connect.
    pub fn validate(&self) -> Result<(&str, &str)> {
        match (self.user.as_deref(), self.name.as_deref()) {
            (Some(user), Some(name)) if !user.is_empty() && !name.is_empty() => Ok((user, name)),
            _ => Err(Error::connection("missing database credentials")),
        }
    }

    /// `postgresql://{user}:{password}@{host}:{port}/{db}`
    #[cfg(test)]
    pub(crate) fn connection_string(&self) -> Result<String> {
        let (user, name) = self.validate()?;
        Ok(format!(
            "postgresql://{}:{}@{}:{}/{}",
            user,
            self.password.as_deref().unwrap_or_default(),
            self.host,
            self.port,
            name
        ))
    }

    /// `postgresql://{user}:***@{host}:{port}/{db}`, for logs.  The connection
    /// itself is built field by field, so no escaping is needed for the password.
    pub fn redacted_connection_string(&self) -> Result<String> {
        let (user, name) = self.validate()?;
        Ok(format!(
            "postgresql://{}:***@{}:{}/{}",
            user, self.host, self.port, name
        ))
    }
}

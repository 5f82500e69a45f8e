//! Configuration for the outer layer.
//!
//! Nothing here is read implicitly: callers build a `PlanningConfig` (by hand
//! or through `from_lookup`) and pass it to whatever constructs providers and
//! runners. The planning engine itself takes no configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ioplan_planning::DEFAULT_HOURS_PER_WORKER_PERIOD;

pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_NAME: &str = "DB_NAME";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Connection parameters of the relational source behind a provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database (facility) holding catalog, coefficient and labor tables.
    pub database: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "DEV_CCP".to_string(),
        }
    }
}

impl core::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

impl SourceConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Build from a key lookup (e.g. `|k| std::env::var(k).ok()`), falling
    /// back to defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup(ENV_DB_HOST) {
            cfg.host = host;
        }
        if let Some(port) = lookup(ENV_DB_PORT) {
            cfg.port = port.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: ENV_DB_PORT,
                reason: format!("{e}"),
            })?;
        }
        if let Some(user) = lookup(ENV_DB_USER) {
            cfg.user = user;
        }
        if let Some(password) = lookup(ENV_DB_PASSWORD) {
            cfg.password = password;
        }
        if let Some(database) = lookup(ENV_DB_NAME) {
            cfg.database = database;
        }
        Ok(cfg)
    }
}

/// Settings for provider construction and batch runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub source: SourceConfig,
    /// Date labor records must be valid on; `None` means today (UTC).
    pub labor_as_of: Option<NaiveDate>,
    /// Used by scenarios that do not set their own value.
    pub default_hours_per_worker: f64,
    pub default_strict_missing_labor: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            labor_as_of: None,
            default_hours_per_worker: DEFAULT_HOURS_PER_WORKER_PERIOD,
            default_strict_missing_labor: false,
        }
    }
}

impl PlanningConfig {
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    pub fn with_labor_as_of(mut self, date: NaiveDate) -> Self {
        self.labor_as_of = Some(date);
        self
    }

    pub fn with_default_hours_per_worker(mut self, hours: f64) -> Self {
        self.default_hours_per_worker = hours;
        self
    }

    pub fn with_default_strict_missing_labor(mut self, strict: bool) -> Self {
        self.default_strict_missing_labor = strict;
        self
    }
}

//! Process-level store bootstrap.
//!
//! # Responsibility
//! - Start logging when configured, open and migrate the database, and run
//!   the first-run seed, in that order.

use crate::config::{ConfigError, CoreConfig};
use crate::db::{open_db, DbError};
use crate::logging::init_logging;
use crate::service::seed::seed_if_empty;
use crate::service::template_service::TemplateServiceError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum StoreInitError {
    Config(ConfigError),
    Logging(String),
    Db(DbError),
    Seed(TemplateServiceError),
}

impl Display for StoreInitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Db(err) => write!(f, "store open failed: {err}"),
            Self::Seed(err) => write!(f, "store seed failed: {err}"),
        }
    }
}

impl Error for StoreInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Seed(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<ConfigError> for StoreInitError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for StoreInitError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<TemplateServiceError> for StoreInitError {
    fn from(value: TemplateServiceError) -> Self {
        Self::Seed(value)
    }
}

/// Opens the configured store, ready for services.
pub fn open_store(config: &CoreConfig) -> Result<Connection, StoreInitError> {
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir).map_err(StoreInitError::Logging)?;
    }

    let conn = open_db(&config.db_path)?;
    if config.seed {
        seed_if_empty(&conn)?;
    }
    Ok(conn)
}

/// Resolves configuration from the environment, then opens the store.
pub fn open_store_from_env() -> Result<Connection, StoreInitError> {
    open_store(&CoreConfig::from_env()?)
}

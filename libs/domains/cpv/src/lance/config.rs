use std::path::PathBuf;

use core_config::{ConfigError, FromEnv, env_or_default};

use crate::schema::TABLE_NAME;

pub const DEFAULT_DB_PATH: &str = "./lancedb";

/// LanceDB location configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanceConfig {
    pub db_path: PathBuf,
    pub table_name: String,
}

impl LanceConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            table_name: TABLE_NAME.to_string(),
        }
    }

    /// Connection URI for `lancedb::connect`.
    pub fn uri(&self) -> String {
        self.db_path.to_string_lossy().into_owned()
    }
}

impl FromEnv for LanceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(env_or_default("CPV_DB_PATH", DEFAULT_DB_PATH)))
    }
}

impl Default for LanceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}

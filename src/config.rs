use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Server configuration. Every field is optional in a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// SQLite database file
    pub database: PathBuf,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    /// Header carrying the authenticated user id
    pub identity_header: String,
    /// Accept the payload's `owner` as the acting user when the identity header is absent
    pub trust_payload_owner: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            database: PathBuf::from("turnote.db"),
            log_level: "info".to_string(),
            identity_header: "x-user-id".to_string(),
            trust_payload_owner: true,
        }
    }
}

impl ServerConfig {
    /// Read a JSON config file, or fall back to defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&raw)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply command line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        bind: Option<String>,
        database: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if let Some(database) = database {
            self.database = database;
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        self
    }
}

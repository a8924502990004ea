use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::util::non_empty;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
}

/// Environment-derived configuration values, kept as raw text until the
/// loader validates them.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<String>,
    pub database_url: Option<String>,
    pub psql_host: Option<String>,
    pub psql_port: Option<String>,
    pub psql_user: Option<String>,
    pub psql_pass: Option<String>,
    pub psql_name: Option<String>,
    pub database_max_connections: Option<String>,
    pub token_secret: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the environment view from any key lookup; blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| non_empty(lookup(key));

        Self {
            config_path: var("BAZAAR_CONFIG").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            server_port: var("SERVER_PORT"),
            database_url: var("DATABASE_URL"),
            psql_host: var("PSQL_HOST"),
            psql_port: var("PSQL_PORT"),
            psql_user: var("PSQL_USER"),
            psql_pass: var("PSQL_PASS"),
            psql_name: var("PSQL_NAME"),
            database_max_connections: var("DATABASE_MAX_CONNECTIONS"),
            token_secret: var("AUTH_TOKEN_SECRET").or_else(|| var("SIGN")),
        }
    }
}

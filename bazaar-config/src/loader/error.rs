use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to load .env file")]
    EnvFile(#[from] dotenvy::Error),
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid database URL")]
    InvalidDatabaseUrl {
        #[source]
        source: url::ParseError,
    },
    #[error("invalid database username '{username}'")]
    InvalidDatabaseUsername { username: String },
    #[error("failed to encode database password into URL")]
    InvalidDatabasePassword,
    #[error("unsupported database scheme '{scheme}', expected postgres or postgresql")]
    UnsupportedDatabaseScheme { scheme: String },
    #[error("no database configured; set DATABASE_URL or PSQL_HOST, PSQL_USER and PSQL_NAME")]
    MissingDatabaseUrl,
    #[error("no token signing secret configured; set AUTH_TOKEN_SECRET")]
    MissingTokenSecret,
}

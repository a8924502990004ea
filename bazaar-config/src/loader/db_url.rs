use url::Url;

use super::error::ConfigLoadError;
use crate::sources::{EnvConfig, FileDatabaseConfig};
use crate::util::{non_empty, parse_value};

const DEFAULT_PSQL_PORT: u16 = 5432;

/// Resolves the PostgreSQL URL from, in order: `DATABASE_URL`, the `PSQL_*`
/// parts, then the config file.
pub fn resolve_database_url(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(url) = env.database_url.as_deref() {
        return validate(url).map(Some);
    }

    if let Some(url) = compose_from_parts(env)? {
        return Ok(Some(url));
    }

    match non_empty(file_database.url.clone()) {
        Some(url) => validate(&url).map(Some),
        None => Ok(None),
    }
}

fn compose_from_parts(env: &EnvConfig) -> Result<Option<String>, ConfigLoadError> {
    let (Some(host), Some(user), Some(name)) = (
        env.psql_host.as_deref(),
        env.psql_user.as_deref(),
        env.psql_name.as_deref(),
    ) else {
        return Ok(None);
    };

    let port = parse_value::<u16>(env.psql_port.clone())
        .map_err(|value| ConfigLoadError::InvalidValue {
            key: "PSQL_PORT",
            value,
        })?
        .unwrap_or(DEFAULT_PSQL_PORT);

    let mut url = Url::parse(&format!("postgresql://{host}:{port}/{name}"))
        .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
    url.set_username(user)
        .map_err(|_| ConfigLoadError::InvalidDatabaseUsername {
            username: user.to_string(),
        })?;
    if let Some(password) = env.psql_pass.as_deref() {
        url.set_password(Some(password))
            .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
    }

    Ok(Some(url.to_string()))
}

fn validate(raw: &str) -> Result<String, ConfigLoadError> {
    let parsed =
        Url::parse(raw).map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;

    match parsed.scheme() {
        "postgres" | "postgresql" => Ok(raw.to_string()),
        other => Err(ConfigLoadError::UnsupportedDatabaseScheme {
            scheme: other.to_string(),
        }),
    }
}

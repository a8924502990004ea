pub mod db_url;
pub mod error;

use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::models::{
    AuthConfig, Config, ConfigMetadata, DEFAULT_HOST, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT,
    DatabaseConfig, ServerConfig,
};
use crate::sources::{EnvConfig, FileConfig};
use crate::util::{non_empty, parse_value};
use crate::validation::{self, ConfigWarnings};
use error::ConfigLoadError;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> =
    Lazy::new(|| vec![PathBuf::from("bazaar.toml"), PathBuf::from("config/bazaar.toml")]);

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Replaces the process environment when set. The `.env` file, if any,
    /// is merged underneath it instead of being exported.
    pub env: Option<HashMap<String, String>>,
    /// Skip the "no database configured" error.
    pub database_optional: bool,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options.env = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    pub fn database_optional(mut self) -> Self {
        self.options.database_optional = true;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env_config, env_file_loaded) = match &self.options.env {
            Some(vars) => self.gather_isolated(vars)?,
            None => self.gather_process()?,
        };

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) = compose_config(
            file_config,
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
            self.options.database_optional,
        )?;

        Ok(ConfigLoad { config, warnings })
    }

    fn gather_process(&self) -> Result<(EnvConfig, bool), ConfigLoadError> {
        let loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };
        let env_file_loaded = loaded.map(|_| true).or_else(|err| match err {
            dotenvy::Error::Io(_) => Ok(false),
            _ => Err(err),
        })?;

        Ok((EnvConfig::gather(), env_file_loaded))
    }

    fn gather_isolated(
        &self,
        vars: &HashMap<String, String>,
    ) -> Result<(EnvConfig, bool), ConfigLoadError> {
        let mut merged = HashMap::new();
        let mut env_file_loaded = false;

        if let Some(path) = &self.options.env_file {
            match dotenvy::from_path_iter(path) {
                Ok(entries) => {
                    for entry in entries {
                        let (key, value) = entry?;
                        merged.insert(key, value);
                    }
                    env_file_loaded = true;
                }
                Err(dotenvy::Error::Io(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        merged.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));

        Ok((
            EnvConfig::from_lookup(|key| merged.get(key).cloned()),
            env_file_loaded,
        ))
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.clone(),
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    metadata: ConfigMetadata,
    database_optional: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No bazaar.toml detected; using environment variables only",
            "Set BAZAAR_CONFIG or pass --config to point at a configuration file",
        );
    }

    let FileConfig {
        server: file_server,
        database: file_database,
        auth: file_auth,
    } = file_config.unwrap_or_default();

    let port = parse_value::<u16>(env.server_port.clone())
        .map_err(|value| ConfigLoadError::InvalidValue {
            key: "SERVER_PORT",
            value,
        })?
        .or(file_server.port)
        .unwrap_or(DEFAULT_PORT);

    let server = ServerConfig {
        host: env
            .server_host
            .clone()
            .or_else(|| non_empty(file_server.host))
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port,
    };

    let database = match db_url::resolve_database_url(&env, &file_database)? {
        Some(url) => Some(DatabaseConfig {
            url,
            max_connections: max_connections(&env, file_database.max_connections)?,
        }),
        None if database_optional => None,
        None => return Err(ConfigLoadError::MissingDatabaseUrl),
    };

    let token_secret = env
        .token_secret
        .or_else(|| non_empty(file_auth.token_secret))
        .ok_or(ConfigLoadError::MissingTokenSecret)?;
    let auth = AuthConfig::new(token_secret);
    validation::check_token_secret(&auth, &mut warnings);

    let config = Config {
        server,
        database,
        auth,
        metadata,
    };

    Ok((config, warnings))
}

fn max_connections(env: &EnvConfig, from_file: Option<u32>) -> Result<u32, ConfigLoadError> {
    let max_connections = parse_value::<u32>(env.database_max_connections.clone())
        .map_err(|value| ConfigLoadError::InvalidValue {
            key: "DATABASE_MAX_CONNECTIONS",
            value,
        })?
        .or(from_file)
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    if max_connections == 0 {
        return Err(ConfigLoadError::InvalidValue {
            key: "DATABASE_MAX_CONNECTIONS",
            value: "0".to_string(),
        });
    }
    Ok(max_connections)
}

//! Configuration loading for the Bazaar account service.
//!
//! Settings are layered from an optional TOML file, an optional `.env` file
//! and the process environment, with environment values taking precedence
//! over the file and the file over built-in defaults. The database URL and
//! token signing secret have no defaults and must come from one of the
//! sources.

pub mod loader;
pub mod models;
pub mod sources;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::{AuthConfig, Config, ConfigMetadata, DatabaseConfig, ServerConfig};
pub use validation::{ConfigWarning, ConfigWarnings};

//! # Bazaar Server
//!
//! Account service binary. Serves the HTTP API over PostgreSQL by default, or
//! over a process-local store with `--in-memory` for development.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use bazaar_config::{Config, ConfigLoad, ConfigLoader};
use bazaar_core::{
    InMemoryStore, MIGRATOR, PostgresAccountStore, PostgresCountryStore, TokenService,
};
use bazaar_server::{infra::app_state::AppState, routes::create_router};
use clap::{Args as ClapArgs, Parser, Subcommand};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "bazaar-server")]
#[command(about = "Account service with signup, login and bearer-token gated account management")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a bazaar.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env when present)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Serve from a process-local store instead of PostgreSQL
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Country to seed the in-memory store with (repeatable)
    #[arg(long = "country", requires = "in_memory")]
    countries: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(&cli.serve)?;

    if let Some(command) = cli.command {
        match command {
            Command::Db(DbCommand::Migrate) => {
                run_db_migrate(&config).await?;
                return Ok(());
            }
        }
    }

    run_server(cli.serve, config).await
}

fn load_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &args.env_file {
        loader = loader.with_env_file(path);
    }
    if args.in_memory {
        loader = loader.database_optional();
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => warn!("{} (hint: {})", warning.message, hint),
            None => warn!("{}", warning.message),
        }
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "loaded configuration file");
    }

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    Ok(config)
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let database = config
        .database
        .as_ref()
        .context("no database configured")?;

    PgPoolOptions::new()
        .max_connections(database.max_connections)
        .connect(&database.url)
        .await
        .context("failed to connect to PostgreSQL")
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let tokens = TokenService::new(config.auth.token_secret.as_bytes());

    let state = if args.in_memory {
        warn!("serving from the in-memory store; nothing will be persisted");
        let store = InMemoryStore::with_countries(args.countries);
        AppState::in_memory(Arc::new(store), tokens)
    } else {
        let pool = connect(&config).await?;
        MIGRATOR
            .run(&pool)
            .await
            .context("database migration failed")?;
        info!("Database migrations applied");

        AppState::new(
            Arc::new(PostgresAccountStore::new(pool.clone())),
            Arc::new(PostgresCountryStore::new(pool)),
            tokens,
        )
    };

    let app = create_router(state);

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Bazaar server listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Bazaar server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

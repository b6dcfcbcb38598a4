//! Mentorship - REST service for assigning mentors to students, backed by MongoDB

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use mentorship::api::{self, ApiDoc, AppState};
use mentorship::config::Config;
use mentorship::store::{MemoryStore, MongoStore};

#[derive(Parser)]
#[command(name = "mentorship")]
#[command(about = "REST service for assigning mentors to students, backed by MongoDB")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// MongoDB connection string (overrides MONGODB_URI)
        #[arg(long)]
        database_url: Option<String>,

        /// Keep data in process memory instead of MongoDB
        #[arg(long)]
        in_memory: bool,
    },

    /// Print the OpenAPI document
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment
    let _ = dotenvy::dotenv();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("mentorship={},tower_http=debug", log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let command = cli.command.unwrap_or(Commands::Serve {
        port: None,
        database_url: None,
        in_memory: false,
    });

    match command {
        Commands::Serve {
            port,
            database_url,
            in_memory,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(url) = database_url {
                config.database_url = url;
            }

            let state = initialize_state(&config, in_memory).await?;
            let router = api::create_router(state);

            let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
            tracing::info!("Server is running on port {}", config.port);

            println!("Mentorship server running at http://localhost:{}", config.port);
            println!("  API Docs: http://localhost:{}/api/docs", config.port);
            println!("  Health:   http://localhost:{}/health", config.port);

            axum::serve(listener, router).await?;
        }

        Commands::Openapi => {
            println!("{}", ApiDoc::openapi().to_pretty_json()?);
        }
    }

    Ok(())
}

async fn initialize_state(config: &Config, in_memory: bool) -> anyhow::Result<AppState> {
    if in_memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        return Ok(AppState::new(Arc::new(MemoryStore::new())));
    }

    let store = MongoStore::connect(config).await?;
    Ok(AppState::new(Arc::new(store)))
}

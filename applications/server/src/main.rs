/// Movieland Server - genre catalogue HTTP API
use clap::{Parser, Subcommand};
use movieland_server::{config::ServerConfig, create_router, AppState, Server};
use movieland_storage::PgDatastore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "movieland-server")]
#[command(about = "Movieland genre API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is process-wide and must be initialized before anything else runs
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "movieland_server=info,movieland_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await?,
        Commands::Migrate => migrate().await?,
    }

    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    let addr = config.socket_addr()?;

    tracing::info!(host = %config.host, port = config.port, "starting movieland server");

    let pool =
        movieland_storage::create_pool(&config.database_url, config.database_ping_timeout).await?;
    movieland_storage::run_migrations(&pool).await?;
    tracing::info!("database connected");

    let app_state = AppState::new(Arc::new(PgDatastore::new(pool.clone())));
    let app = create_router(app_state);

    let result = Server::new(addr, app).run().await;

    pool.close().await;
    result?;

    Ok(())
}

async fn migrate() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    let pool =
        movieland_storage::create_pool(&config.database_url, config.database_ping_timeout).await?;
    movieland_storage::run_migrations(&pool).await?;
    pool.close().await;

    tracing::info!("migrations applied");
    Ok(())
}

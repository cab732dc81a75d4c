use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use trivia_api::configuration::get_configuration;
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Settings file, merged over the built-in defaults
    #[clap(long, default_value = "configuration.yaml")]
    config: PathBuf,
    /// Overrides application.host
    #[clap(long)]
    host: Option<String>,
    /// Overrides application.port
    #[clap(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let mut settings = get_configuration(&cli.config).context("Failed to read configuration")?;
    if let Some(host) = cli.host {
        settings.application.host = host;
    }
    if let Some(port) = cli.port {
        settings.application.port = port;
    }
    let addr = settings
        .application
        .address()
        .context("application.host and application.port do not form a socket address")?;

    let pool = establish_connection(&settings.database.path)
        .await
        .with_context(|| format!("Cannot open database {}", settings.database.path.display()))?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool).await?;

    run_server(pool, addr).await
}

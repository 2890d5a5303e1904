use clap::Parser;
use services::{AppServices, Clock};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::{Cli, Command, prepare_sqlite_file};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fusha=info,services=info,storage=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve()?;

    // Open + migrate SQLite at startup, close it before exit.
    prepare_sqlite_file(&config.db_url)?;
    let app = AppServices::new_sqlite(&config.db_url, Clock::system(), config.audio).await?;
    info!(db = %config.db_url, "storage ready");

    let result = commands::dispatch(&app, cli.command.unwrap_or(Command::Levels)).await;
    app.shutdown().await;
    result
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

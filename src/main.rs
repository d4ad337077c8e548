// src/main.rs - unibot entry point

use clap::Parser;

use unibot::cli::{Cli, Commands};
use unibot::infra::config::Config;
use unibot::infra::logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Falls back to defaults if no config.toml
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    // Respects UNIBOT_LOG / RUST_LOG over the configured level
    logger::init_logging(&config.logging.level);

    match cli.command {
        Commands::Serve { port } => unibot::cli::serve::run_serve(config, port).await,
        Commands::Chat { session, offline } => {
            unibot::cli::chat::run_chat(&config, session, offline).await
        }
    }
}

//! Skriv CLI entry point.

use anyhow::Result;
use clap::Parser;
use skriv::cli::{commands, Cli, Commands};
use skriv::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("skriv={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Produce(args) => {
            commands::run_produce(args, settings).await?;
        }

        Commands::Titles {
            input,
            file,
            language,
            topic,
            count,
        } => {
            commands::run_titles(
                input.as_deref(),
                file.as_deref(),
                language,
                topic,
                count,
                settings,
            )
            .await?;
        }

        Commands::Voices { demo, output } => {
            commands::run_voices(demo, output, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}

use anyhow::Context;
use book_covers::config::cli::Command;
use book_covers::core::orchestrator::until_cancelled;
use book_covers::core::ConfigProvider;
use book_covers::utils::{logger, validation::Validate};
use book_covers::{CliConfig, CoverError, CoverOrchestrator, HttpCoverClient, TomlConfig};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // Logging
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting book-covers CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // Ctrl-C raises the caller token instead of killing the process
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling outstanding requests");
            on_interrupt.cancel();
        }
    });

    // Load the file configuration, with command-line values on top.
    // Requests that do not watch the token are dropped once it is raised.
    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut file = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            cli.apply_to(&mut file);
            until_cancelled(run(&file, &cli.command, &cancel), &cancel).await
        }
        None => until_cancelled(run(&cli, &cli.command, &cancel), &cancel).await,
    };

    if let Err(e) = result {
        let cancelled = e
            .downcast_ref::<CoverError>()
            .is_some_and(CoverError::is_cancellation);
        if cancelled {
            tracing::warn!("Cancelled before all covers were retrieved");
            eprintln!("❌ Cancelled before all covers were retrieved");
            std::process::exit(1);
        }

        tracing::error!("❌ book-covers failed: {:#}", e);
        eprintln!("❌ {:#}", e);
        eprintln!("💡 Check --base-url and that the cover service is reachable");
        std::process::exit(1);
    }

    Ok(())
}

async fn run<C>(config: &C, command: &Command, cancel: &CancellationToken) -> anyhow::Result<()>
where
    C: ConfigProvider + Validate,
{
    // Validate
    config.validate().context("invalid configuration")?;

    let client = HttpCoverClient::from_config(config)?;

    match command {
        Command::Covers { book_id } => {
            let orchestrator =
                CoverOrchestrator::with_kind(Arc::new(client), config.strategy(), config.variants());
            let covers = orchestrator.fetch_covers_for(*book_id, cancel).await?;

            tracing::info!("✅ Retrieved {} covers for book {}", covers.len(), book_id);
            println!("{}", serde_json::to_string_pretty(&covers)?);
        }
        Command::Cover { id } => match client.get_cover(id).await? {
            Some(cover) => println!("{}", serde_json::to_string_pretty(&cover)?),
            None => {
                tracing::warn!("Cover {} not found", id);
                println!("null");
            }
        },
    }

    Ok(())
}

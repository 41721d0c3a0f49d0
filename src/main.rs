use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newswire::app::AppContext;
use newswire::cli::{commands, Cli, Commands};
use newswire::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "newswire=debug"
    } else {
        "newswire=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    match cli.command {
        Commands::Run(args) => {
            let mut config =
                Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
            args.apply(&mut config);

            let ctx = AppContext::new(config)?;
            let outcome = commands::run_extraction(&ctx).await?;
            if let Some(e) = outcome.error {
                return Err(anyhow::Error::new(e).context(format!(
                    "Extraction stopped early; {} records were saved",
                    outcome.records.len()
                )));
            }
        }
        Commands::Window { months } => {
            let config =
                Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
            commands::show_window(&config, months)?;
        }
        Commands::Init { force } => {
            commands::init_config(cli.config.as_deref(), force)?;
        }
    }

    Ok(())
}

use std::path::Path;

use chrono::Utc;
use tracing::warn;

use crate::app::{AppContext, NewswireError, Result};
use crate::config::Config;
use crate::domain::RecencyWindow;
use crate::engine;
use crate::scraper::{ChromeSurface, RunOutcome};

/// Launch Chrome, run the extraction and write whatever was collected.
pub async fn run_extraction(ctx: &AppContext) -> Result<RunOutcome> {
    ctx.config.validate()?;

    let surface = ChromeSurface::launch(&ctx.config.browser).await?;
    let result = engine::run(&surface, ctx.downloader.as_ref(), &ctx.config, Utc::now()).await;
    if let Err(e) = surface.close().await {
        warn!("{}", e);
    }
    let outcome = result?;

    let path = ctx.records_path();
    ctx.sink.write(&outcome.records, &path)?;
    println!(
        "Wrote {} records to {} ({})",
        outcome.records.len(),
        path.display(),
        outcome.stop
    );
    if outcome.skipped > 0 {
        println!("Skipped {} items", outcome.skipped);
    }

    Ok(outcome)
}

pub fn show_window(config: &Config, months: Option<i32>) -> Result<()> {
    let months = months.unwrap_or(config.search.months_back);
    let window = RecencyWindow::resolve(Utc::now(), months)?;
    println!(
        "{} month(s): {}-{:02} through {}",
        months,
        window.earliest_year,
        window.earliest_month,
        window.latest.format("%Y-%m-%d")
    );
    Ok(())
}

pub fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_config_path().map_err(|e| NewswireError::Config(e.to_string()))?,
    };

    if path.exists() && !force {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }

    Config::create_default_config(&path).map_err(|e| NewswireError::Config(e.to_string()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_respects_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# mine").unwrap();

        init_config(Some(&path), false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        init_config(Some(&path), true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[search]"));
    }

    #[test]
    fn test_show_window_rejects_non_positive_months() {
        let config = Config::default();
        assert!(show_window(&config, Some(0)).is_err());
        assert!(show_window(&config, None).is_ok());
    }
}

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, OutputFormat};

#[derive(Parser)]
#[command(name = "newswire")]
#[command(about = "Collect recent articles from a news site's search listing", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/newswire/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the site and extract articles inside the recency window
    Run(RunArgs),
    /// Show the recency window a run would use
    Window {
        /// Months to look back, counting the current month
        #[arg(short, long)]
        months: Option<i32>,
    },
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Per-run overrides of the configuration file.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Search phrase
    #[arg(short, long)]
    pub phrase: Option<String>,

    /// Category filter label
    #[arg(long)]
    pub category: Option<String>,

    /// Months to look back, counting the current month
    #[arg(short, long)]
    pub months: Option<i32>,

    /// Landing page of the news site
    #[arg(long)]
    pub url: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_parser = parse_format)]
    pub format: Option<OutputFormat>,

    /// Stop after this many result pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

impl RunArgs {
    pub fn apply(self, config: &mut Config) {
        if let Some(phrase) = self.phrase {
            config.search.search_phrase = phrase;
        }
        if let Some(category) = self.category {
            config.search.category = Some(category);
        }
        if let Some(months) = self.months {
            config.search.months_back = months;
        }
        if let Some(url) = self.url {
            config.search.start_url = url;
        }
        if let Some(output) = self.output {
            config.output.directory = output;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.max_pages.is_some() {
            config.search.max_pages = self.max_pages;
        }
        if self.headed {
            config.browser.headless = false;
        }
    }
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "xlsx" => Ok(OutputFormat::Xlsx),
        "csv" => Ok(OutputFormat::Csv),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("Unknown format: {}. Use 'xlsx', 'csv' or 'json'", other)),
    }
}

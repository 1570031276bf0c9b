use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use futures::future::join_all;
use serde_json::json;
use tracing::{error, info, warn};

use whisky_extract::config::Config;
use whisky_extract::utils::{create_client, init_tracing, source_for, PageSource};
use whisky_extract::{extract_with, ExtractOptions};

#[derive(Debug, Parser)]
#[command(name = "whisky-extract")]
#[command(about = "Extract normalized whisky product records from shop pages")]
struct Cli {
    /// Product page URLs or saved HTML files
    #[arg(required = true)]
    sources: Vec<String>,

    /// Attach debug info to every record
    #[arg(long)]
    debug: bool,

    /// Config file (defaults to whisky_extract.toml when present)
    #[arg(long, env = "WHISKY_EXTRACT_CONFIG")]
    config: Option<String>,

    /// refUrl for saved files
    #[arg(long)]
    ref_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    init_tracing(config.log_json)?;

    info!(
        "--- Extracting {} source(s) at {} ---",
        cli.sources.len(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let client = create_client(&config)?;
    let options = ExtractOptions {
        include_debug: cli.debug || config.include_debug,
    };

    let sources = cli
        .sources
        .iter()
        .map(|arg| source_for(arg, &client, config.max_retries, cli.ref_url.clone()))
        .collect::<Result<Vec<Box<dyn PageSource>>>>()?;

    // Fetch all sources concurrently; one failure never aborts the batch
    let fetches = sources.iter().map(|source| async move {
        match source.fetch().await {
            Ok(page) => Some(page),
            Err(e) => {
                error!("Failed to load {}: {:#}", source.ref_url(), e);
                None
            }
        }
    });
    let pages = join_all(fetches).await;

    let mut found = 0;
    for (source, page) in sources.iter().zip(pages) {
        let Some(page) = page else { continue };

        let output = match extract_with(&page, &options) {
            Some(record) => {
                found += 1;
                info!("Extracted {} from {}", record.title(), page.url);
                serde_json::to_string_pretty(&record)
            }
            None => {
                warn!("No product data found on {}", source.ref_url());
                serde_json::to_string_pretty(&json!({ "refUrl": page.url, "result": null }))
            }
        }
        .context("Failed to serialize record")?;

        println!("{}", output);
    }

    info!("Extraction completed: {}/{} records", found, sources.len());
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use scraper::Html;
use std::fs;

use whisky_extract::config::Config;
use whisky_extract::models::{Field, LabelValuePair};
use whisky_extract::scrapers::{normalize, Extraction};
use whisky_extract::utils::{create_client, init_tracing, source_for};

/// Report how each stage handled a product page.
#[derive(Debug, Parser)]
#[command(name = "analyze_html")]
struct Args {
    /// Product page URL or saved HTML file
    source: String,

    /// Save the fetched HTML here
    #[arg(long)]
    save: Option<String>,

    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    init_tracing(config.log_json)?;

    let client = create_client(&config)?;
    let source = source_for(&args.source, &client, config.max_retries, None)?;

    println!("Fetching {}...", source.ref_url());
    let page = source.fetch().await?;
    println!("Loaded {} bytes", page.html.len());

    if let Some(path) = &args.save {
        fs::write(path, &page.html).with_context(|| format!("Failed to save {}", path))?;
        println!("Saved HTML to {}", path);
    }

    let document = Html::parse_document(&page.html);
    let extraction = Extraction::run(&document)?;

    println!("\n== Structured data ==");
    match &extraction.blob {
        Some(blob) => {
            println!("Located by recognizer: {}", blob.recognizer);
            match extraction.probe {
                Some(probe) => println!("Shape resolved by probe: {}", probe),
                None => println!("No probe found a product object"),
            }
        }
        None => println!("No embedded data located"),
    }
    print_pairs("Structured information", &extraction.structured.information);
    print_pairs("Structured tasting notes", &extraction.structured.tasting_notes);

    println!("\n== Markup ==");
    print_pairs("HTML information", &extraction.html.information);
    print_pairs("HTML tasting notes", &extraction.html.tasting_notes);

    println!("\n== Merged fields ==");
    for field in Field::ALL {
        if let (Some(value), Some(source)) =
            (extraction.merged.get(field), extraction.merged.sources.get(&field))
        {
            println!("{:<14} [{:<10}] {}", field.key(), source.to_string(), preview(value));
        }
    }

    println!("\n== Record ==");
    match normalize(&extraction.merged, &page.url) {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("No result"),
    }

    Ok(())
}

fn print_pairs(title: &str, pairs: &[LabelValuePair]) {
    println!("{} ({}):", title, pairs.len());
    for pair in pairs {
        println!("  {}", pair);
    }
}

fn preview(value: &str) -> String {
    const MAX_CHARS: usize = 80;
    if value.chars().count() > MAX_CHARS {
        format!("{}...", value.chars().take(MAX_CHARS).collect::<String>())
    } else {
        value.to_string()
    }
}

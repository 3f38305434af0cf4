use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use headliner::classify::CategoryTable;
use headliner::config::Config;
use headliner::ingest::build_client;
use headliner::scrape::run_scrape;
use headliner::storage::Database;

/// Get the config directory path (~/.config/headliner/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("headliner"))
}

#[derive(Parser, Debug)]
#[command(name = "headliner", about = "Scrape configured RSS feeds into a categorized headline store")]
struct Args {
    /// Config file path (default: ~/.config/headliner/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database file path (overrides the config file)
    #[arg(long, value_name = "FILE")]
    db: Option<String>,

    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path).context("Failed to load configuration")?;

    if config.feeds.is_empty() {
        eprintln!("Warning: no feeds configured, nothing to scrape");
        eprintln!("Add [[feeds]] entries to {}", config_path.display());
    }

    let db_path = args.db.unwrap_or(config.db_path.clone());

    if args.reset_db && std::path::Path::new(&db_path).exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    // Store-open failure is the one fatal error: without the store there is
    // no run to summarize.
    let db = Database::open(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    // Seed reference data before the run. The pipeline itself never creates
    // sources or categories, it only resolves them.
    let categories = CategoryTable::builtin();
    let category_rows: Vec<(&str, &str)> =
        categories.all().map(|rule| (rule.name, rule.icon)).collect();
    db.seed_categories(&category_rows)
        .await
        .context("Failed to seed categories")?;

    let source_names: Vec<&str> = config.feeds.iter().map(|f| f.name.as_str()).collect();
    db.seed_sources(&source_names)
        .await
        .context("Failed to seed sources")?;

    let client =
        build_client(&config.scrape.user_agent).context("Failed to build HTTP client")?;

    let summaries = run_scrape(&db, &client, &config.feeds, &config.scrape, &categories).await;

    let mut total_inserted = 0;
    for summary in &summaries {
        println!("----- {} -----", summary.name);
        match &summary.outcome {
            Ok(counts) => {
                println!(
                    "  new: {}  duplicates: {}  seen: {}",
                    counts.inserted, counts.duplicates, counts.seen
                );
                total_inserted += counts.inserted;
            }
            Err(e) => {
                println!("  error: {}", e);
            }
        }
    }
    println!("Total new headlines: {}", total_inserted);

    Ok(())
}

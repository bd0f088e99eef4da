//! CLI administration tool for edge-url-shortener.
//!
//! Talks to the configured key-value store directly, without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the first page of mappings
//! cargo run --bin admin -- list
//!
//! # Show every mapping
//! cargo run --bin admin -- list --all
//!
//! # Shorten a URL (prompts when omitted)
//! cargo run --bin admin -- shorten https://example.com/long/path
//!
//! # Look up a short identifier
//! cargo run --bin admin -- resolve a1b2c3
//!
//! # Check the store
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `PUBLIC_DOMAIN` is required, `REDIS_URL` selects the
//! Redis store. Without Redis the tool runs against an empty in-memory store,
//! which is only useful for trying commands out.

use edge_url_shortener::application::services::{AllocationService, EnumerationService};
use edge_url_shortener::config::{self, Config};
use edge_url_shortener::domain::entities::Mapping;
use edge_url_shortener::domain::repositories::KeyValueStore;
use edge_url_shortener::server::build_store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use std::sync::Arc;

/// CLI tool for managing edge-url-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List stored mappings
    List {
        /// Follow pagination tokens to the end
        #[arg(short, long)]
        all: bool,

        /// Continue from a token printed by a previous call
        #[arg(short, long, conflicts_with = "all")]
        token: Option<String>,
    },

    /// Shorten a URL, returning the existing identifier if there is one
    Shorten {
        /// URL to shorten
        url: Option<String>,
    },

    /// Print the URL behind a short identifier
    Resolve {
        /// Short identifier
        id: String,
    },

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

/// Store diagnostic subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Check store connectivity and show its version tag
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;

    let store = build_store(&config).await?;

    match cli.command {
        Commands::List { all, token } => handle_list(&config, store, all, token).await?,
        Commands::Shorten { url } => handle_shorten(&config, store, url).await?,
        Commands::Resolve { id } => handle_resolve(&config, store, &id).await?,
        Commands::Store { action } => handle_store_action(action, store).await?,
    }

    Ok(())
}

/// Lists one page, or every page with `--all`.
///
/// # Output Format
///
/// ```text
/// 📋 Mappings
///
///   ID       URL
///   ──────────────────────────────────────────────
///   a1b2c3   https://example.com/some/long/path
///
///   Next token: YTFiMmMz
/// ```
async fn handle_list(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    all: bool,
    token: Option<String>,
) -> Result<()> {
    println!("{}", "📋 Mappings".bright_blue().bold());
    println!();

    let service = EnumerationService::new(store, config.list_page_size);

    let (mappings, next_token) = if all {
        (service.list_all().await?, None)
    } else {
        let page = service.list(token).await?;
        (page.mappings, page.next_cursor)
    };

    if mappings.is_empty() {
        println!("{}", "  No mappings found".yellow());
        return Ok(());
    }

    print_mappings(&mappings);

    println!();
    println!(
        "  Shown: {}",
        mappings.len().to_string().bright_white().bold()
    );
    if let Some(next) = next_token {
        println!("  Next token: {}", next.bright_cyan());
    }
    println!();

    Ok(())
}

fn print_mappings(mappings: &[Mapping]) {
    println!(
        "  {:<8} {}",
        "ID".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for mapping in mappings {
        println!(
            "  {:<8} {}",
            mapping.short_id.cyan(),
            mapping.original_url
        );
    }
}

/// Allocates a short identifier, prompting for the URL when not given.
async fn handle_shorten(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    url: Option<String>,
) -> Result<()> {
    println!("{}", "✂️  Shorten URL".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("URL to shorten")
            .interact_text()?,
    };

    let service = AllocationService::new(store, config.allocation_settings());

    let allocation = service.allocate_with_retry(&url).await?;

    if allocation.created {
        println!("{}", "✅ Short URL created".green().bold());
    } else {
        println!("{}", "ℹ️  URL was already shortened".yellow());
    }
    println!();
    println!("  ID:  {}", allocation.short_id.cyan());
    println!("  URL: {}", allocation.short_url.bright_yellow().bold());
    println!();

    Ok(())
}

async fn handle_resolve(config: &Config, store: Arc<dyn KeyValueStore>, id: &str) -> Result<()> {
    let service = EnumerationService::new(store, config.list_page_size);

    let mapping = service.resolve(id).await?;

    println!("{} → {}", mapping.short_id.cyan(), mapping.original_url);

    Ok(())
}

/// Handles store diagnostic commands.
async fn handle_store_action(action: StoreAction, store: Arc<dyn KeyValueStore>) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!("{}", "🔍 Checking key-value store...".bright_blue());

            let description = store
                .describe()
                .await
                .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

            let version = description
                .etag
                .context("Store did not return a version tag")?;

            println!("{}", "✅ Store OK".green().bold());
            println!();
            println!("  Store:   {}", description.store_id.bright_white());
            println!("  Items:   {}", description.item_count.to_string().bright_green().bold());
            println!("  Version: {}", version.to_string().bright_black());
            println!();
        }
    }

    Ok(())
}

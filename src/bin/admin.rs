//! CLI administration tool for linkshort.
//!
//! Manages links directly in PostgreSQL, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List links, optionally filtered
//! cargo run --bin admin -- links list --query docs
//!
//! # Show one link
//! cargo run --bin admin -- links show Ab3xY9
//!
//! # Create a link (random or custom code)
//! cargo run --bin admin -- links create https://example.com --code promo24
//!
//! # Soft-delete a link
//! cargo run --bin admin -- links delete Ab3xY9
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database variables as the server (`DATABASE_URL` or `DB_*`), plus
//! `BASE_URL` for printing short URLs.

use linkshort::application::services::LinkService;
use linkshort::config::{Config, StorageBackend};
use linkshort::domain::entities::Link;
use linkshort::infrastructure::persistence::PgLinkRepository;
use linkshort::server::connect_database;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkshort.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List active links, newest first
    List {
        /// Only show links whose code or URL contains this text
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show one link with its click statistics
    Show {
        /// Short code
        code: String,
    },

    /// Create a short link
    Create {
        /// Target URL (http or https)
        url: String,

        /// Custom code (6-8 letters or digits); random if omitted
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Soft-delete a link
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    config.storage_backend = StorageBackend::Postgres;
    if config.database_url.is_none() {
        anyhow::bail!("DATABASE_URL must be set");
    }
    config.validate()?;

    let pool = connect_database(&config).await?;

    let repository = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repository, config.base_url.clone());

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &service).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, service: &LinkService) -> Result<()> {
    match action {
        LinkAction::List { query } => list_links(service, query).await,
        LinkAction::Show { code } => show_link(service, &code).await,
        LinkAction::Create { url, code } => create_link(service, &url, code.as_deref()).await,
        LinkAction::Delete { code, yes } => delete_link(service, &code, yes).await,
    }
}

/// Lists active links as a table.
///
/// # Output Format
///
/// ```text
/// 🔗 Links
///
///   Code      Clicks  Created            URL
///   ─────────────────────────────────────────────────────────────────────
///   Ab3xY9    12      2026-01-15 10:30   https://example.com/docs
/// ```
async fn list_links(service: &LinkService, query: Option<String>) -> Result<()> {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let links = service
        .list_links(query.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<9} {:<7} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<9} {:<7} {:<18} {}",
            link.code.cyan(),
            link.clicks.to_string().bright_white(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.target_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

fn print_link(service: &LinkService, link: &Link) {
    println!("  Code:         {}", link.code.cyan());
    println!("  Short URL:    {}", service.short_url(&link.code).bright_yellow());
    println!("  Target URL:   {}", link.target_url);
    println!("  Clicks:       {}", link.clicks.to_string().bright_white().bold());
    println!(
        "  Last clicked: {}",
        link.last_clicked_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string())
            .bright_black()
    );
    println!(
        "  Created:      {}",
        link.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
}

async fn show_link(service: &LinkService, code: &str) -> Result<()> {
    let link = service
        .get_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", code, e))?;

    println!("{}", "📊 Link".bright_blue().bold());
    println!();
    print_link(service, &link);
    println!();

    Ok(())
}

async fn create_link(service: &LinkService, url: &str, code: Option<&str>) -> Result<()> {
    println!("{}", "✨ Create Link".bright_blue().bold());
    println!();

    let link = service
        .create_short_link(url, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    print_link(service, &link);
    println!();
    println!("{}", "✅ Link created successfully!".green().bold());
    println!();

    Ok(())
}

/// Soft-deletes a link after confirmation (default: No).
async fn delete_link(service: &LinkService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .get_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", code, e))?;

    print_link(service, &link);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link? Its code will never be reused.")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

/// Displays link and click totals.
async fn handle_stats(service: &LinkService) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let totals = service
        .totals()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!("  Links (all):     {}", totals.total.to_string().bright_white().bold());
    println!("  Links (active):  {}", totals.active.to_string().green());
    println!("  Links (deleted): {}", totals.deleted.to_string().red());
    println!("  Total clicks:    {}", totals.clicks.to_string().cyan());
    println!();

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1")
                .execute(pool)
                .await
                .context("Database query failed")?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Info".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let size: String =
                sqlx::query_scalar("SELECT pg_size_pretty(pg_database_size(current_database()))")
                    .fetch_one(pool)
                    .await?;
            let links_size: String =
                sqlx::query_scalar("SELECT pg_size_pretty(pg_total_relation_size('links'))")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL:  {}", version.bright_black());
            println!("  Database:    {}", size.cyan());
            println!("  links table: {}", links_size.cyan());
            println!();
        }
    }

    Ok(())
}

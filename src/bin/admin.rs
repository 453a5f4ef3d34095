//! CLI administration tool for shortlink.
//!
//! Inspects links and runs maintenance against the PostgreSQL store without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show a link
//! cargo run --bin admin -- link show aZ3_k9Q
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Remove expired links now
//! cargo run --bin admin -- cleanup --yes
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use shortlink::application::services::CleanupScheduler;
use shortlink::config::Config;
use shortlink::domain::clock::{Clock, SystemClock};
use shortlink::domain::entities::LinkRecord;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use chrono::{NaiveTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Delete every expired link now
    Cleanup {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show a single link
    Show {
        /// Short identifier
        id: String,
    },
}

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

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let repo: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Link {
            action: LinkAction::Show { id },
        } => show_link(repo.as_ref(), &id).await?,
        Commands::Stats => handle_stats(repo.as_ref()).await?,
        Commands::Cleanup { yes } => handle_cleanup(repo, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn show_link(repo: &dyn LinkRepository, id: &str) -> Result<()> {
    let link = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Link '{}' not found", id))?;

    print_link(&link);
    Ok(())
}

fn print_link(link: &LinkRecord) {
    let now = Utc::now();
    let status = if link.is_expired_at(now) {
        "EXPIRED".red()
    } else if link.is_permanent() {
        "PERMANENT".green()
    } else {
        "ACTIVE".green()
    };

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  ID:        {}", link.id.cyan());
    println!("  Original:  {}", link.original_url);
    println!("  Short:     {}", link.short_url.bright_white());
    println!("  Clicks:    {}", link.clicks.to_string().bright_green().bold());
    println!(
        "  Created:   {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
    );
    match link.expires_at {
        Some(expires_at) => println!(
            "  Expires:   {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
        ),
        None => println!("  Expires:   {}", "never".bright_black()),
    }
    println!("  Status:    {}", status);
    println!();
}

/// Displays link and click totals.
async fn handle_stats(repo: &dyn LinkRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let counts = repo
        .counts(SystemClock.now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!("  Links:           {}", counts.total.to_string().bright_green().bold());
    println!("    permanent:     {}", counts.permanent.to_string().bright_white());
    println!("    expiring:      {}", counts.expiring.to_string().bright_white());
    println!("    expired:       {}", counts.expired_pending.to_string().yellow());
    println!("  Clicks:          {}", counts.total_clicks.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Runs one sweep immediately, after confirmation.
async fn handle_cleanup(repo: Arc<dyn LinkRepository>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Cleanup".bright_blue().bold());
    println!();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let pending = repo
        .counts(clock.now())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .expired_pending;

    if pending == 0 {
        println!("{}", "  Nothing to clean up".green());
        return Ok(());
    }

    println!("  Expired links: {}", pending.to_string().yellow().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete them now?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    // The schedule time is unused for a one-off sweep.
    let scheduler = CleanupScheduler::new(repo, clock, NaiveTime::default());
    let removed = scheduler
        .sweep()
        .await
        .map_err(|e| anyhow::anyhow!("Cleanup failed: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Removed".green().bold(),
        removed.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

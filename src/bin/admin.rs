//! CLI administration tool for keyed-shortener.
//!
//! Manages API keys and checks the database without going through the HTTP
//! admin endpoints.
//!
//! # Usage
//!
//! ```bash
//! # Issue a new API key
//! cargo run --bin admin -- key create --name "Mobile App"
//!
//! # List all keys
//! cargo run --bin admin -- key list
//!
//! # Revoke / reactivate a key (by id or name)
//! cargo run --bin admin -- key revoke "Mobile App"
//! cargo run --bin admin -- key activate 3
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string, or `DB_HOST`, `DB_PORT`,
//!   `DB_USER`, `DB_PASSWORD` and `DB_NAME` as for the server
//! - `SECRET_KEY` (required): must match the server's, or issued keys won't authenticate

use keyed_shortener::application::services::ApiKeyService;
use keyed_shortener::config::Config;
use keyed_shortener::domain::entities::ApiKey;
use keyed_shortener::domain::repositories::ApiKeyRepository;
use keyed_shortener::infrastructure::persistence::PgApiKeyRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing keyed-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API keys
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Issue a new API key
    Create {
        /// Key name (e.g., "Production API", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all keys
    List,

    /// Revoke a key
    Revoke {
        /// Key name or ID
        name_or_id: String,
    },

    /// Reactivate a revoked key
    Activate {
        /// Key name or ID
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,

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

    match cli.command {
        Commands::Key { action } => handle_key_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_key_action(action: KeyAction, pool: &PgPool) -> Result<()> {
    let secret_key = std::env::var("SECRET_KEY").context("SECRET_KEY must be set")?;
    let repo: Arc<dyn ApiKeyRepository> = Arc::new(PgApiKeyRepository::new(Arc::new(pool.clone())));
    let service = ApiKeyService::new(repo.clone(), secret_key);

    match action {
        KeyAction::Create { name, yes } => create_key(&service, name, yes).await?,
        KeyAction::List => list_keys(&service).await?,
        KeyAction::Revoke { name_or_id } => {
            set_key_status(&service, repo.as_ref(), &name_or_id, false).await?
        }
        KeyAction::Activate { name_or_id } => {
            set_key_status(&service, repo.as_ref(), &name_or_id, true).await?
        }
    }

    Ok(())
}

/// Issues a key after an optional confirmation and prints the plaintext once.
async fn create_key(service: &ApiKeyService, name: Option<String>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔑 Create API Key".bright_blue().bold());
    println!();

    let key_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Key name")
            .with_initial_text("Production API")
            .interact_text()?,
    };

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Issue a key named \"{}\"?", key_name))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let issued = service
        .issue(&key_name)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create key: {}", e))?;

    println!();
    println!("{}", "✅ Key created successfully!".green().bold());
    println!();
    println!("  ID:   {}", issued.key.id.to_string().bright_black());
    println!("  Name: {}", issued.key.name.cyan());
    println!("  Key:  {}", issued.plaintext.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this key now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"X-API-Key: {}\" http://localhost:3000/api/urls",
        issued.plaintext.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_keys(service: &ApiKeyService) -> Result<()> {
    println!("{}", "📋 API Keys".bright_blue().bold());
    println!();

    let keys = service
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list keys: {}", e))?;

    if keys.is_empty() {
        println!("{}", "  No keys found".yellow());
        println!();
        println!(
            "  Create one with: {} admin key create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<20} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for key in &keys {
        let status = if key.is_active {
            "ACTIVE".green()
        } else {
            "REVOKED".red()
        };

        println!(
            "  {:<5} {:<30} {:<20} {}",
            key.id.to_string().bright_black(),
            key.name.cyan(),
            key.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", keys.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Looks a key up by numeric id, falling back to an exact name match.
async fn find_key(repo: &dyn ApiKeyRepository, name_or_id: &str) -> Result<ApiKey> {
    let key = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    key.context("API key not found")
}

/// Revokes (`active == false`) or reactivates a key.
///
/// Revocation asks for confirmation (default: No) since it cuts off a client
/// immediately.
async fn set_key_status(
    service: &ApiKeyService,
    repo: &dyn ApiKeyRepository,
    name_or_id: &str,
    active: bool,
) -> Result<()> {
    let title = if active {
        "🔓 Activate API Key"
    } else {
        "🔒 Revoke API Key"
    };
    println!("{}", title.bright_blue().bold());
    println!();

    let key = find_key(repo, name_or_id).await?;

    if key.is_active == active {
        let state = if active { "active" } else { "revoked" };
        println!("{}", format!("⚠️  This key is already {state}").yellow());
        return Ok(());
    }

    println!("  Key: {}", key.name.cyan());
    println!("  ID:  {}", key.id.to_string().bright_black());
    println!();

    if !active {
        let confirmed = Confirm::new()
            .with_prompt("Revoke this key?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .set_active(key.id, active)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update key: {}", e))?;

    println!();
    let done = if active {
        "✅ Key activated successfully!"
    } else {
        "✅ Key revoked successfully!"
    };
    println!("{}", done.green().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1")
                .execute(pool)
                .await
                .context("Database connection failed")?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            keyed_shortener::server::migrate(pool).await?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Info".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let keys = PgApiKeyRepository::new(Arc::new(pool.clone()))
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count keys: {}", e))?;
            let urls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
                .fetch_one(pool)
                .await?;

            println!("  Version:    {}", version.bright_white());
            println!("  API keys:   {}", keys.to_string().bright_white().bold());
            println!("  Short URLs: {}", urls.to_string().bright_white().bold());
            println!();
        }
    }

    Ok(())
}

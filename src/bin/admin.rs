//! CLI administration tool for s8l.
//!
//! Manages users and API tokens and shows service statistics without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a user
//! cargo run --bin admin -- user create alice
//!
//! # Issue a token for that user
//! cargo run --bin admin -- token create --user alice --name "CLI"
//!
//! # List tokens (optionally for one user)
//! cargo run --bin admin -- token list --user alice
//!
//! # Revoke a token by name or id
//! cargo run --bin admin -- token revoke "CLI"
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
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server's

use s8l::application::services::auth_service::{generate_raw_token, hash_token};
use s8l::domain::repositories::{ApiToken, TokenRepository};
use s8l::infrastructure::persistence::PgTokenRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing s8l.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Unique username
        username: String,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Owner of the token
        #[arg(short, long)]
        user: String,

        /// Token name (e.g., "Browser extension")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List tokens
    List {
        /// Only show tokens of this user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
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

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::User { action } => match action {
            UserAction::Create { username } => create_user(repo, username).await?,
        },
        Commands::Token { action } => handle_token_action(action, repo).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn create_user(repo: Arc<PgTokenRepository>, username: String) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        anyhow::bail!("Username must not be empty");
    }

    let user = repo
        .create_user(username)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!(
        "{} {} (id {})",
        "✅ Created user".green().bold(),
        user.username.cyan(),
        user.id.to_string().bright_black()
    );

    Ok(())
}

async fn handle_token_action(action: TokenAction, repo: Arc<PgTokenRepository>) -> Result<()> {
    match action {
        TokenAction::Create {
            user,
            name,
            token,
            yes,
        } => create_token(repo, user, name, token, yes).await,
        TokenAction::List { user } => list_tokens(repo, user).await,
        TokenAction::Revoke { name_or_id } => revoke_token(repo, name_or_id).await,
    }
}

/// Creates a new API token for a user.
///
/// # Flow
///
/// 1. Resolve the owning user
/// 2. Prompt for token name (or use provided)
/// 3. Generate random token or use provided value
/// 4. Confirm creation (unless `--yes` flag)
/// 5. Store the HMAC-SHA256 hash
///
/// The raw token is displayed once and cannot be retrieved later.
async fn create_token(
    repo: Arc<PgTokenRepository>,
    username: String,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let user = repo
        .find_user_by_name(&username)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("User '{}' not found", username))?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Browser")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => generate_raw_token(),
    };

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  User:  {}", user.username.cyan());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.create_token(user.id, &token_name, &hash_token(&secret, &token_value))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/user-urls",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: Arc<PgTokenRepository>, username: Option<String>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let user_id = match username {
        Some(name) => Some(
            repo.find_user_by_name(&name)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .with_context(|| format!("User '{}' not found", name))?
                .id,
        ),
        None => None,
    };

    let tokens = repo
        .list_tokens(user_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<6} {:<28} {:<18} {:<18} {:<8}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(88).bright_black());

    for token in &tokens {
        print_token_row(token);
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

fn print_token_row(token: &ApiToken) {
    let status = if token.revoked_at.is_some() {
        "REVOKED".red()
    } else {
        "ACTIVE".green()
    };
    let last_used = token
        .last_used_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!(
        "  {:<5} {:<6} {:<28} {:<18} {:<18} {}",
        token.id.to_string().bright_black(),
        token.user_id.to_string().bright_black(),
        token.name.cyan(),
        token.created_at.format("%Y-%m-%d %H:%M").to_string(),
        last_used.bright_black(),
        status
    );
}

/// Revokes a token by name or ID with confirmation prompt.
async fn revoke_token(repo: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo
            .list_tokens(None)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
            .into_iter()
            .find(|t| t.id == id),
        Err(_) => repo
            .find_by_name(&name_or_id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
    };

    let token = token.context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays URL, link, domain, click, and token counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let urls = sqlx::query_scalar!(r#"SELECT COUNT(*) AS "count!" FROM urls"#)
        .fetch_one(pool)
        .await?;

    let clicks =
        sqlx::query_scalar!(r#"SELECT COALESCE(SUM(click_count), 0)::BIGINT AS "clicks!" FROM urls"#)
            .fetch_one(pool)
            .await?;

    let aliases = sqlx::query_scalar!(r#"SELECT COUNT(*) AS "count!" FROM user_urls"#)
        .fetch_one(pool)
        .await?;

    let domains = sqlx::query_scalar!(r#"SELECT COUNT(*) AS "count!" FROM custom_domains"#)
        .fetch_one(pool)
        .await?;

    let tokens = sqlx::query_scalar!(
        r#"SELECT COUNT(*) AS "count!" FROM api_tokens WHERE revoked_at IS NULL"#
    )
    .fetch_one(pool)
    .await?;

    for (label, value) in [
        ("Short URLs", urls),
        ("Clicks", clicks),
        ("User links", aliases),
        ("Custom domains", domains),
        ("Active tokens", tokens),
    ] {
        println!(
            "  {:<15} {}",
            format!("{}:", label),
            value.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

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

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

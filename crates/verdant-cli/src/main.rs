use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::context::AppContext;

#[derive(Parser)]
#[command(name = "verdant")]
#[command(about = "Verdant CLI - plant care companion client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the Verdant backend
    Login {
        /// Account email address
        #[arg(long)]
        email: Option<String>,
        /// Account password
        #[arg(long)]
        password: Option<String>,
        /// Google ID token, as an alternative to email/password
        #[arg(long)]
        google_token: Option<String>,
    },
    /// Sign out and clear the device session
    Logout,
    /// Show the current session
    Status {
        /// Re-fetch the account record from the backend first
        #[arg(long)]
        refresh: bool,
    },
    /// Manage the UI language
    Lang {
        #[command(subcommand)]
        action: LangAction,
    },
}

#[derive(Subcommand)]
enum LangAction {
    /// List the languages the backend supports
    List,
    /// Show the active language
    Get,
    /// Switch to another language
    Set { code: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::init().await?;

    match cli.command {
        Commands::Login {
            email,
            password,
            google_token,
        } => commands::auth::login(&ctx, email, password, google_token).await?,
        Commands::Logout => commands::auth::logout(&ctx).await?,
        Commands::Status { refresh } => commands::auth::status(&ctx, refresh).await?,
        Commands::Lang { action } => match action {
            LangAction::List => commands::lang::list(&ctx).await?,
            LangAction::Get => commands::lang::get(&ctx).await?,
            LangAction::Set { code } => commands::lang::set(&ctx, &code).await?,
        },
    }

    Ok(())
}

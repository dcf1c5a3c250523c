//! Exportdesk CLI - operator console for the export business admin API.
//!
//! Sign in, manage the product catalog, and work the contact inbox from the
//! terminal.

mod cli;
mod commands;
mod error;
mod session_store;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("exportdesk=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth_cmd::run_login(api_url, &email, &password).await?;
        }
        Commands::Logout => commands::auth_cmd::run_logout(api_url)?,
        Commands::Status => commands::auth_cmd::run_status()?,
        Commands::SetPassword {
            password,
            confirm_password,
        } => {
            commands::auth_cmd::run_set_password(api_url, &password, &confirm_password).await?;
        }
        Commands::Setup {
            email,
            mobile,
            password,
            confirm_password,
        } => {
            commands::setup::run_setup(api_url, email, mobile, password, confirm_password).await?;
        }
        Commands::Recover => commands::recover::run_recover(api_url).await?,
        Commands::Products { command } => commands::products::run_products(api_url, command).await?,
        Commands::Messages { command } => commands::messages::run_messages(api_url, command).await?,
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}

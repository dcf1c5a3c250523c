//! One-time initial-admin bootstrap command.

use exportdesk_core::setup::{AdminBootstrap, SetupClient, SetupOutcome};

use crate::commands::common;
use crate::error::CliError;

pub async fn run_setup(
    api_url: Option<&str>,
    email: String,
    mobile: String,
    password: String,
    confirm_password: String,
) -> Result<(), CliError> {
    let config = common::resolve_config(api_url)?;
    let setup = SetupClient::new(config)?;

    let outcome = setup
        .create_initial_admin(AdminBootstrap {
            email: email.clone(),
            mobile,
            password,
            confirm_password,
        })
        .await?;

    match outcome {
        SetupOutcome::Created(message) => {
            println!("{message}");
            println!("Sign in with `exportdesk login {email} <password>`.");
        }
        SetupOutcome::AlreadyCompleted(message) => {
            // terminal: do not retry setup, go to login instead
            println!("{message}");
            println!("Setup was already performed; sign in with `exportdesk login`.");
        }
    }
    Ok(())
}

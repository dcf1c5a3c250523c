//! Interactive three-step password recovery.

use exportdesk_core::recovery::{RecoveryFlow, RecoveryState};

use crate::commands::common;
use crate::error::CliError;

/// Walks the email -> OTP -> new-password flow on stdin. Failed steps keep
/// their state so the user just answers the same prompt again; a blank OTP
/// starts the flow over with a different email.
pub async fn run_recover(api_url: Option<&str>) -> Result<(), CliError> {
    let config = common::resolve_config(api_url)?;
    let mut flow = RecoveryFlow::new(config)?;

    println!("Reset your password using your registered email address.");
    while !flow.is_completed() {
        match flow.state() {
            RecoveryState::AwaitingEmail => {
                let email = common::prompt_line("Registered email address: ")?;
                match flow.submit_email(&email).await {
                    Ok(message) => println!("{message}"),
                    Err(error) => eprintln!("{error}"),
                }
            }
            RecoveryState::AwaitingOtp => {
                let prompt = format!("OTP sent to {} (blank to change email): ", flow.email());
                let otp = common::prompt_line(&prompt)?;
                if otp.is_empty() {
                    flow.start_over();
                    continue;
                }
                match flow.submit_otp(&otp).await {
                    Ok(message) => println!("{message}"),
                    Err(error) => eprintln!("{error}"),
                }
            }
            RecoveryState::AwaitingReset => {
                let password = common::prompt_line("New password: ")?;
                let confirm_password = common::prompt_line("Confirm new password: ")?;
                match flow.submit_new_password(&password, &confirm_password).await {
                    Ok(message) => println!("{message}"),
                    Err(error) => eprintln!("{error}"),
                }
            }
            RecoveryState::Completed => {}
        }
    }

    println!("Sign in with `exportdesk login` using your new password.");
    Ok(())
}

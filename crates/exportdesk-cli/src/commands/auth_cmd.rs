//! Login, logout, status, and first-login password handlers.

use exportdesk_core::auth::AuthClient;
use exportdesk_core::routes::Route;

use crate::commands::common;
use crate::error::CliError;
use crate::session_store::KeyringSessionStore;

pub async fn run_login(api_url: Option<&str>, email: &str, password: &str) -> Result<(), CliError> {
    let config = common::resolve_config(api_url)?;
    let auth = AuthClient::new(config, KeyringSessionStore::new())?;

    let session = auth.login(email, password).await?;
    if session.is_first_login {
        println!("Signed in as {email}.");
        println!("This is your first login: choose a new password with `exportdesk set-password`.");
    } else {
        println!("Signed in as {email}.");
    }
    Ok(())
}

pub fn run_logout(api_url: Option<&str>) -> Result<(), CliError> {
    let config = common::resolve_config(api_url)?;
    let auth = AuthClient::new(config, KeyringSessionStore::new())?;
    auth.logout()?;
    println!("Signed out.");
    Ok(())
}

pub fn run_status() -> Result<(), CliError> {
    let credentials = common::credential_store()?;
    let session = credentials.current();
    if !session.is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    if session.is_first_login {
        println!("Signed in; first-login password change pending (`exportdesk set-password`).");
    } else {
        println!("Signed in.");
    }
    Ok(())
}

pub async fn run_set_password(
    api_url: Option<&str>,
    password: &str,
    confirm_password: &str,
) -> Result<(), CliError> {
    let credentials = common::credential_store()?;
    common::require_admission(&credentials, Route::SetPassword)?;

    let config = common::resolve_config(api_url)?;
    let auth = AuthClient::new(config, KeyringSessionStore::new())?;
    let message = auth.set_password(password, confirm_password).await?;

    println!("{message}");
    println!("You have been signed out; sign in again with your new password.");
    Ok(())
}

//! Admin auth client for login, logout, and first-login password setup.

use reqwest::Client;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::http;
use crate::session::{CredentialStore, Session, SessionStore};

/// Client for the `/auth` and `/users` credential endpoints.
///
/// Owns the credential store; no other component writes session state.
#[derive(Clone)]
pub struct AuthClient<S: SessionStore> {
    config: ApiConfig,
    client: Client,
    credentials: CredentialStore<S>,
}

impl<S: SessionStore> AuthClient<S> {
    pub fn new(config: ApiConfig, store: S) -> Result<Self> {
        Ok(Self {
            config,
            client: Client::builder().build()?,
            credentials: CredentialStore::new(store)?,
        })
    }

    /// The credential store this client writes to.
    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    /// Authenticates the administrator and persists the issued token.
    ///
    /// The returned session carries the server's first-login flag; callers
    /// decide whether to steer the user to the set-password surface.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;

        let payload = serde_json::json!({
            "email": email.trim(),
            "password": password,
        });
        let response = self
            .client
            .post(self.config.endpoint("/auth/login"))
            .json(&payload)
            .send()
            .await?;
        let response = http::check(response).await?;

        let payload = response.json::<LoginResponse>().await?;
        let token = payload
            .token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                Error::Network("login response did not include a token".to_string())
            })?;

        let session = Session::new(token, payload.is_first_login);
        self.credentials.set(session.clone())?;
        Ok(session)
    }

    /// Clears all session state unconditionally. Idempotent; no request is
    /// made (the server holds no logout endpoint).
    pub fn logout(&self) -> Result<()> {
        self.credentials.clear()
    }

    /// Sets a new password for the signed-in administrator.
    ///
    /// On success the session is cleared: the first-login flow always ends in
    /// a fresh login with the new credentials, never a silent carry-over.
    pub async fn set_password(&self, password: &str, confirm_password: &str) -> Result<String> {
        let session = self.credentials.current();
        if !session.is_authenticated() {
            return Err(Error::Auth("Not signed in".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("Password is required".to_string()));
        }
        if password != confirm_password {
            return Err(Error::Validation("Passwords do not match.".to_string()));
        }

        let payload = serde_json::json!({
            "password": password,
            "confirmPassword": confirm_password,
        });
        let response = self
            .client
            .post(self.config.endpoint("/users/set-password"))
            .bearer_auth(&session.token)
            .json(&payload)
            .send()
            .await?;
        let response = http::check(response).await?;
        let message = http::read_message(response, "Password set successfully").await?;

        self.credentials.clear()?;
        Ok(message)
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::Validation("Email is required".to_string()));
    }
    if password.is_empty() {
        return Err(Error::Validation("Password is required".to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: Option<String>,
    #[serde(default)]
    is_first_login: bool,
}

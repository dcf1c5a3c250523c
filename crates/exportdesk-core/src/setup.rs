//! One-time initial-admin bootstrap.

use reqwest::Client;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::http;

/// Marker the server includes in its message once bootstrap has been done.
const ALREADY_COMPLETED_MARKER: &str = "setup already completed";

/// Request payload for creating the first administrator account.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("mobile", &self.mobile)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

/// How a bootstrap attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// Account created; the caller should send the user to login.
    Created(String),
    /// Setup was already performed. Terminal: the caller must redirect to
    /// login instead of retrying.
    AlreadyCompleted(String),
}

/// Client for the `/auth/initial-setup` endpoint.
///
/// Bootstrap never establishes a session; the created admin signs in through
/// the normal login flow afterwards.
#[derive(Clone)]
pub struct SetupClient {
    config: ApiConfig,
    client: Client,
}

impl SetupClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self {
            config,
            client: Client::builder().build()?,
        })
    }

    pub async fn create_initial_admin(&self, request: AdminBootstrap) -> Result<SetupOutcome> {
        validate_bootstrap(&request)?;

        let payload = serde_json::json!({
            "email": request.email.trim(),
            "mobile": request.mobile.trim(),
            "password": request.password,
            "confirmPassword": request.confirm_password,
        });
        let response = self
            .client
            .post(self.config.endpoint("/auth/initial-setup"))
            .json(&payload)
            .send()
            .await?;

        match http::check(response).await {
            Ok(response) => {
                let message = http::read_message(
                    response,
                    "Admin account created successfully. Please login.",
                )
                .await?;
                Ok(SetupOutcome::Created(message))
            }
            Err(Error::ServerMessage(message))
                if message.to_lowercase().contains(ALREADY_COMPLETED_MARKER) =>
            {
                Ok(SetupOutcome::AlreadyCompleted(message))
            }
            Err(error) => Err(error),
        }
    }
}

fn validate_bootstrap(request: &AdminBootstrap) -> Result<()> {
    if !request.email.trim().contains('@') {
        return Err(Error::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    if request.mobile.trim().is_empty() {
        return Err(Error::Validation("Mobile number is required".to_string()));
    }
    if request.password.is_empty() || request.confirm_password.is_empty() {
        return Err(Error::Validation("Password is required".to_string()));
    }
    Ok(())
}

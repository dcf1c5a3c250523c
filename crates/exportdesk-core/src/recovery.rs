//! Three-step password recovery flow (email, OTP, new password).

use reqwest::Client;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::http;

/// Where the flow currently stands. Transitions move forward only on a
/// successful submission; `start_over` is the single backward edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryState {
    AwaitingEmail,
    AwaitingOtp,
    AwaitingReset,
    Completed,
}

/// Drives the forgot-password endpoints while holding the step state.
///
/// On any failed submission the flow stays exactly where it was, so the user
/// can correct the input and resubmit. No OTP expiry or resend throttling is
/// tracked here; that policy is server-owned.
pub struct RecoveryFlow {
    config: ApiConfig,
    client: Client,
    state: RecoveryState,
    email: String,
    otp: String,
}

impl RecoveryFlow {
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self {
            config,
            client: Client::builder().build()?,
            state: RecoveryState::AwaitingEmail,
            email: String::new(),
            otp: String::new(),
        })
    }

    pub const fn state(&self) -> RecoveryState {
        self.state
    }

    /// The email the OTP was sent to, once past the first step.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub const fn is_completed(&self) -> bool {
        matches!(self.state, RecoveryState::Completed)
    }

    /// Resets the flow fully to `AwaitingEmail` ("start over" / "change
    /// email").
    pub fn start_over(&mut self) {
        self.state = RecoveryState::AwaitingEmail;
        self.email.clear();
        self.otp.clear();
    }

    /// Step 1: request an OTP for the registered email address.
    pub async fn submit_email(&mut self, email: &str) -> Result<String> {
        if self.state != RecoveryState::AwaitingEmail {
            return Err(Error::Validation(
                "Recovery is not waiting for an email address".to_string(),
            ));
        }
        let email = email.trim();
        if !email.contains('@') {
            return Err(Error::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }

        let response = self
            .client
            .post(self.config.endpoint("/auth/forgot-password"))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        let response = http::check(response).await?;
        let message = http::read_message(response, "OTP sent to your email address").await?;

        self.email = email.to_string();
        self.state = RecoveryState::AwaitingOtp;
        Ok(message)
    }

    /// Step 2: prove control of the email by echoing the OTP back.
    pub async fn submit_otp(&mut self, otp: &str) -> Result<String> {
        if self.state != RecoveryState::AwaitingOtp {
            return Err(Error::Validation(
                "Recovery is not waiting for an OTP".to_string(),
            ));
        }
        let otp = otp.trim();
        if otp.is_empty() {
            return Err(Error::Validation("Please enter the OTP".to_string()));
        }

        let response = self
            .client
            .post(self.config.endpoint("/auth/verify-reset-otp"))
            .json(&serde_json::json!({
                "email": self.email,
                "otp": otp,
            }))
            .send()
            .await?;
        let response = http::check(response).await?;
        let message = http::read_message(response, "OTP verified successfully").await?;

        self.otp = otp.to_string();
        self.state = RecoveryState::AwaitingReset;
        Ok(message)
    }

    /// Step 3: set the new password. Completing the flow does NOT create a
    /// session; the caller redirects to login.
    pub async fn submit_new_password(
        &mut self,
        password: &str,
        confirm_password: &str,
    ) -> Result<String> {
        if self.state != RecoveryState::AwaitingReset {
            return Err(Error::Validation(
                "Recovery is not waiting for a new password".to_string(),
            ));
        }
        if password != confirm_password {
            return Err(Error::Validation("Passwords do not match".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("Password is required".to_string()));
        }

        let response = self
            .client
            .post(self.config.endpoint("/auth/reset-password"))
            .json(&serde_json::json!({
                "email": self.email,
                "password": password,
                "confirmPassword": confirm_password,
            }))
            .send()
            .await?;
        let response = http::check(response).await?;
        let message =
            http::read_message(response, "Password reset successful. Please login.").await?;

        self.state = RecoveryState::Completed;
        Ok(message)
    }
}

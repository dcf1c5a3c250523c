//! Shared response handling for the admin REST API.

use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::util::compact_text;

#[derive(Debug, Deserialize)]
struct ApiMessageBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pass a successful response through, or drain the body and map the
/// failure onto the error taxonomy.
pub(crate) async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_for(status, &body))
}

/// Map a non-2xx status and body onto `Auth`, `ServerMessage`, or `Network`.
pub(crate) fn error_for(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ApiMessageBody>(body)
        .ok()
        .and_then(|payload| payload.message.or(payload.error))
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty());

    if status == StatusCode::UNAUTHORIZED {
        return Error::Auth(message.unwrap_or_else(|| "Invalid credentials".to_string()));
    }

    match message {
        Some(message) => Error::ServerMessage(message),
        None => {
            let trimmed = compact_text(body);
            if trimmed.is_empty() {
                Error::Network(format!("HTTP {}", status.as_u16()))
            } else {
                Error::Network(format!("HTTP {}: {trimmed}", status.as_u16()))
            }
        }
    }
}

/// Read the server's `{message}` payload from a successful response,
/// falling back to a fixed string when the body omits it.
pub(crate) async fn read_message(response: Response, fallback: &str) -> Result<String> {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessageBody>(&body)
        .ok()
        .and_then(|payload| payload.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty());
    Ok(message.unwrap_or_else(|| fallback.to_string()))
}

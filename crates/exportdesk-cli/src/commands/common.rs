//! Shared helpers for command handlers.

use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use exportdesk_core::resources::ImageUpload;
use exportdesk_core::routes::{self, Route, RouteDecision};
use exportdesk_core::{ApiConfig, CredentialStore};

use crate::error::CliError;
use crate::session_store::KeyringSessionStore;

/// Resolves the API config from the `--api-url` flag, the environment, or
/// the localhost default.
pub fn resolve_config(api_url: Option<&str>) -> Result<ApiConfig, CliError> {
    let config = match api_url {
        Some(url) => ApiConfig::new(url)?,
        None => ApiConfig::from_env()?,
    };
    tracing::debug!("Using API base URL {}", config.base_url());
    Ok(config)
}

/// Credential store backed by the OS keyring.
pub fn credential_store() -> Result<CredentialStore<KeyringSessionStore>, CliError> {
    Ok(CredentialStore::new(KeyringSessionStore::new())?)
}

/// Route-gate check before entering a protected surface.
///
/// A concrete surface only ever redirects to the login surface, which for a
/// CLI means "not signed in".
pub fn require_admission(
    credentials: &CredentialStore<KeyringSessionStore>,
    route: Route,
) -> Result<(), CliError> {
    match routes::evaluate(&credentials.current(), route) {
        RouteDecision::Admit => Ok(()),
        RouteDecision::Redirect(_) => Err(CliError::NotSignedIn),
    }
}

/// y/N confirmation prompt; `assume_yes` skips it.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, CliError> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(parse_confirmation(&answer))
}

pub fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prompts for a single line on stdin, trimmed.
pub fn prompt_line(label: &str) -> Result<String, CliError> {
    print!("{label}");
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().lock().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

/// Reads an image file into a submission part, deriving the content type
/// from the file extension.
pub fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToString::to_string)
        .ok_or_else(|| CliError::InvalidImagePath(path.display().to_string()))?;
    let bytes = std::fs::read(path)?;
    Ok(ImageUpload {
        content_type: image_content_type(&file_name).to_string(),
        file_name,
        bytes,
    })
}

pub fn image_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Truncates to `max_chars`, collapsing whitespace, with a `...` tail.
pub fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(timestamp).num_milliseconds();
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Renders a timestamp column: relative time, or a dash when the server
/// omitted the field.
pub fn timestamp_column(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(|| "-".to_string(), |at| format_relative_time(at, Utc::now()))
}

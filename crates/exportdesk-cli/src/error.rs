use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] exportdesk_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Not signed in. Run `exportdesk login <email> <password>` first.")]
    NotSignedIn,
    #[error("Image path has no usable file name: {0}")]
    InvalidImagePath(String),
}

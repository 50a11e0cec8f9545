//! Error types for Skycast

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkycastError>;

#[derive(Error, Debug)]
pub enum SkycastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Image fetch failed: {0}")]
    ImageFetch(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SkycastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SkycastError::InvalidInput(_) => 3,
            SkycastError::Client(ClientError::Authentication(_)) => 2,
            SkycastError::Client(_) => 1,
            SkycastError::Config(_) => 1,
            SkycastError::Session(_) => 1,
            SkycastError::ImageFetch(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),
}

/// Errors around the persisted session file.
///
/// `Read` keeps the io source so the session-recovery path can distinguish a
/// missing file (`ErrorKind::NotFound`, recoverable) from every other io
/// failure (not recoverable).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to read session file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write session file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by a [`SkyClient`](crate::client::SkyClient) implementation.
///
/// `InvalidSession` and `BadRequest` are the only variants the session
/// manager treats as recoverable; everything else is terminal for the
/// operation that produced it.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("stored session is not usable: {0}")]
    InvalidSession(String),

    #[error("blob upload failed: {0}")]
    Upload(String),

    #[error("posting failed: {0}")]
    Posting(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("rate limit exceeded: {0}")]
    RateLimit(String),
}

//! Configuration for Skycast
//!
//! The system's external configuration surface is environment variables
//! (credentials, session-file path, optional footer), so every struct here
//! has a `from_env` constructor. The structs themselves are plain values:
//! nothing reads the environment after construction time.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Default session-file name, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = "bsky_session.json";

/// Credentials and session-file location for the primary identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Account identifier (handle or email)
    pub identifier: String,
    /// App password
    pub password: String,
    /// Where the serialized session token is persisted
    pub session_file: PathBuf,
}

impl SessionConfig {
    /// Build the primary-session configuration from the environment.
    ///
    /// Reads `BSKY_USER_NAME` and `BSKY_APP_PASS` (both required) and
    /// `BSKY_SESSION_FILE` (optional, tilde-expanded, defaults to
    /// [`DEFAULT_SESSION_FILE`]).
    pub fn from_env() -> Result<Self> {
        let identifier = require_env("BSKY_USER_NAME")?;
        let password = require_env("BSKY_APP_PASS")?;
        let session_file = match std::env::var("BSKY_SESSION_FILE") {
            Ok(path) if !path.is_empty() => PathBuf::from(shellexpand::tilde(&path).to_string()),
            _ => PathBuf::from(DEFAULT_SESSION_FILE),
        };

        Ok(Self {
            identifier,
            password,
            session_file,
        })
    }
}

/// Caller-supplied credentials for a guest session.
///
/// Guest sessions act on behalf of a different identity: nothing is read
/// from the environment and nothing is persisted.
#[derive(Debug, Clone)]
pub struct GuestCredentials {
    pub identifier: String,
    pub password: String,
}

/// Promotional footer appended to every formatted post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footer {
    /// Display text of the footer link
    pub text: String,
    /// Link target
    pub url: String,
}

impl Footer {
    /// Footer from `FOOTER_TEXT` / `FOOTER_URL`.
    ///
    /// Returns `None` unless `FOOTER_URL` is set. A missing `FOOTER_TEXT`
    /// falls back to the URL itself as the display text.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("FOOTER_URL").ok().filter(|u| !u.is_empty())?;
        let text = std::env::var("FOOTER_TEXT")
            .ok()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| url.clone());
        Some(Self { text, url })
    }
}

/// Formatter behavior.
///
/// The default (`detect_links: false`, no footer) extracts hashtags only.
/// [`FormatOptions::from_env`] enables link extraction and picks up the
/// configured footer, which is the full formatting behavior.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Also extract URL tokens into link facets
    pub detect_links: bool,
    /// Footer link appended after all extracted entities
    pub footer: Option<Footer>,
}

impl FormatOptions {
    pub fn from_env() -> Self {
        Self {
            detect_links: true,
            footer: Footer::from_env(),
        }
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name.to_string()).into()),
    }
}

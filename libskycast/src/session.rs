//! Session management
//!
//! Gets the client into an authenticated state, preferring a session token
//! persisted from a previous run over a fresh credential login, and keeps
//! the persisted token current.
//!
//! The recovery contract is deliberately narrow. Exactly three conditions
//! make [`SessionManager::load_or_create`] fall back to a fresh login: the
//! session file is missing, the stored token does not parse, or the server
//! rejects the token as a bad request. Every other failure (an unreadable
//! file, a network outage, a rate limit, a server error) propagates to the
//! caller, so that real problems are never masked as a stale session. Do
//! not widen this set.

use std::io::ErrorKind;

use tracing::info;

use crate::client::SkyClient;
use crate::config::{GuestCredentials, SessionConfig};
use crate::error::{ClientError, Result, SessionError, SkycastError};

/// The three recoverable conditions, matched explicitly.
fn is_recoverable(error: &SkycastError) -> bool {
    match error {
        SkycastError::Session(SessionError::Read { source, .. }) => {
            source.kind() == ErrorKind::NotFound
        }
        SkycastError::Client(ClientError::InvalidSession(_)) => true,
        SkycastError::Client(ClientError::BadRequest(_)) => true,
        _ => false,
    }
}

/// Owns a [`SkyClient`] and the session-file lifecycle around it.
pub struct SessionManager<C> {
    client: C,
    config: SessionConfig,
}

impl<C: SkyClient> SessionManager<C> {
    pub fn new(client: C, config: SessionConfig) -> Self {
        Self { client, config }
    }

    /// Authenticate by resuming the persisted session, falling back to a
    /// fresh credential login when the stored session is unusable.
    pub async fn load_or_create(&mut self) -> Result<()> {
        info!(
            path = %self.config.session_file.display(),
            "trying saved session"
        );
        match self.resume_saved().await {
            Ok(()) => Ok(()),
            Err(error) if is_recoverable(&error) => {
                info!(%error, "saved session unusable, creating a fresh session");
                self.create_session().await
            }
            Err(error) => Err(error),
        }
    }

    /// Credential login, then persist the exported session token,
    /// overwriting any previous file.
    pub async fn create_session(&mut self) -> Result<()> {
        self.client
            .login(&self.config.identifier, &self.config.password)
            .await?;

        let token = self.client.export_session().await?;
        std::fs::write(&self.config.session_file, token).map_err(|source| SessionError::Write {
            path: self.config.session_file.clone(),
            source,
        })?;

        info!(
            path = %self.config.session_file.display(),
            "session saved"
        );
        Ok(())
    }

    /// The current session's serialized form, without writing it anywhere.
    pub async fn export_session(&self) -> Result<String> {
        self.client.export_session().await
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Hand the authenticated client to the caller (typically to build a
    /// [`Poster`](crate::poster::Poster)).
    pub fn into_client(self) -> C {
        self.client
    }

    async fn resume_saved(&mut self) -> Result<()> {
        let path = &self.config.session_file;
        let token = std::fs::read_to_string(path).map_err(|source| SessionError::Read {
            path: path.clone(),
            source,
        })?;
        self.client.resume_session(&token).await
    }
}

/// Authenticate `client` on behalf of a different identity.
///
/// A supplied `saved` token is tried first; if the server rejects it as a
/// bad request or it does not parse, the guest credentials are used
/// instead. Nothing is read from the environment and nothing is persisted,
/// so the primary session file is left untouched.
pub async fn guest_session<C: SkyClient>(
    client: &mut C,
    saved: Option<&str>,
    credentials: &GuestCredentials,
) -> Result<()> {
    if let Some(token) = saved {
        info!("trying supplied guest session");
        match client.resume_session(token).await {
            Ok(()) => return Ok(()),
            Err(error) if is_recoverable(&error) => {
                info!(%error, "guest session unusable, logging in with guest credentials");
            }
            Err(error) => return Err(error),
        }
    }
    client
        .login(&credentials.identifier, &credentials.password)
        .await
}

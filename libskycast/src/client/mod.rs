//! Client seam for the AT Protocol service
//!
//! The library never talks to the service directly: session management and
//! posting are written against the [`SkyClient`] trait, which captures the
//! slice of the SDK surface this system consumes (login, session
//! resume/export, blob upload, record creation). The real implementation
//! wraps `bsky-sdk`; the mock implementation records calls so the
//! orchestration above it can be tested without credentials or network
//! access.

use async_trait::async_trait;

use bsky_sdk::api::types::BlobRef;

use crate::error::Result;
use crate::richtext::RichText;

pub mod bsky;

// Mock client is available for all builds (not just tests) to support
// integration tests.
pub mod mock;

/// Handle to a blob the service has accepted.
///
/// Opaque to callers: it is produced by [`SkyClient::upload_blob`] and
/// consumed by the embed of a subsequent post.
#[derive(Debug, Clone)]
pub struct UploadedBlob {
    pub(crate) blob: BlobRef,
}

/// External-link preview card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCard {
    pub link: String,
    pub title: String,
}

/// One image of an image-embed list.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub blob: UploadedBlob,
    pub alt: String,
}

/// Embed attached to a post record. Post shapes are mutually exclusive:
/// a post carries no embed, an image list, or one external card.
#[derive(Debug, Clone)]
pub enum PostEmbed {
    Images(Vec<EmbeddedImage>),
    External {
        card: LinkCard,
        thumb: Option<UploadedBlob>,
    },
}

/// The upstream collaborator contract.
///
/// Errors are classified into [`ClientError`](crate::error::ClientError):
/// implementations must report an unparsable session token as
/// `InvalidSession` and a server-side bad-request rejection as `BadRequest`,
/// because those two variants (plus a missing session file) are exactly
/// what the session manager recovers from.
#[async_trait]
pub trait SkyClient: Send + Sync {
    /// Credential login, replacing whatever session the client held.
    async fn login(&mut self, identifier: &str, password: &str) -> Result<()>;

    /// Resume a previously exported session from its serialized form.
    async fn resume_session(&mut self, token: &str) -> Result<()>;

    /// Serialize the current session without persisting it.
    async fn export_session(&self) -> Result<String>;

    /// Upload raw bytes as a blob.
    async fn upload_blob(&self, bytes: Vec<u8>) -> Result<UploadedBlob>;

    /// Create the post record and return the service's reference (AT-URI).
    async fn create_post(&self, rich: &RichText, embed: Option<PostEmbed>) -> Result<String>;
}

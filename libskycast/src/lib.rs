//! Skycast - a small helper layer over the Bluesky client SDK
//!
//! This library manages authentication-session persistence (restore a saved
//! session token or log in fresh, and keep the token file current) and
//! formats outgoing posts: hashtags and links are split into facet spans,
//! link-preview cards get their thumbnails uploaded, and image attachments
//! are fetched and uploaded before the post record is created. The AT
//! Protocol itself is the SDK's job, not ours.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod poster;
pub mod richtext;
pub mod session;

// Re-export commonly used types
pub use client::bsky::BskyClient;
pub use client::{EmbeddedImage, LinkCard, PostEmbed, SkyClient, UploadedBlob};
pub use config::{FormatOptions, Footer, GuestCredentials, SessionConfig};
pub use error::{ClientError, ConfigError, Result, SessionError, SkycastError};
pub use poster::{fetch_image_bytes, Poster};
pub use richtext::{build_rich_text, RichText, TextBuilder};
pub use session::{guest_session, SessionManager};

//! Bluesky SDK client implementation

use async_trait::async_trait;
use bsky_sdk::agent::config::Config as AgentConfig;
use bsky_sdk::api::app::bsky::embed::{external, images};
use bsky_sdk::api::app::bsky::feed::post::{RecordData, RecordEmbedRefs};
use bsky_sdk::api::types::string::Datetime;
use bsky_sdk::api::types::Union;
use bsky_sdk::BskyAgent;

use crate::client::{PostEmbed, SkyClient, UploadedBlob};
use crate::error::{ClientError, Result};
use crate::richtext::RichText;

/// Classify an SDK error into the [`ClientError`] taxonomy.
///
/// The SDK's error types are layered wrappers around XRPC responses, so
/// classification inspects the rendered message and debug output, the same
/// way the status and AT Protocol error codes surface there. Bad-request
/// detection comes first: the session-recovery contract depends on a stale
/// or rejected token classifying as `BadRequest`, and token-expiry codes
/// would otherwise be swallowed by the authentication bucket. 401s stay in
/// the authentication bucket and are deliberately not recoverable.
fn map_sdk_error<E: std::fmt::Display + std::fmt::Debug>(error: E, context: &str) -> ClientError {
    let message = format!("{}", error);
    let debug = format!("{:?}", error);

    if message.contains("400")
        || message.contains("InvalidRequest")
        || message.contains("ExpiredToken")
        || message.contains("InvalidToken")
        || debug.contains("BadRequest")
    {
        return ClientError::BadRequest(format!("{}: {}", context, message));
    }

    if message.contains("401")
        || message.contains("403")
        || message.contains("AuthenticationRequired")
        || message.contains("AccountNotFound")
        || debug.contains("Unauthorized")
        || debug.contains("Forbidden")
    {
        return ClientError::Authentication(format!("{}: {}", context, message));
    }

    if message.contains("429")
        || message.contains("RateLimitExceeded")
        || message.contains("TooManyRequests")
        || debug.contains("RateLimit")
    {
        return ClientError::RateLimit(format!("{}: {}", context, message));
    }

    if message.contains("connection")
        || message.contains("network")
        || message.contains("timeout")
        || message.contains("unreachable")
        || message.contains("dns")
        || debug.contains("Connect")
        || debug.contains("Timeout")
    {
        return ClientError::Network(format!("{}: {}", context, message));
    }

    match context {
        "login" => ClientError::Authentication(format!("{}: {}", context, message)),
        "upload blob" => ClientError::Upload(format!("{}: {}", context, message)),
        _ => ClientError::Posting(format!("{}: {}", context, message)),
    }
}

fn to_record(rich: &RichText, embed: Option<PostEmbed>) -> RecordData {
    RecordData {
        created_at: Datetime::now(),
        embed: embed.map(to_embed_refs),
        entities: None,
        facets: rich.facets(),
        labels: None,
        langs: None,
        reply: None,
        tags: None,
        text: rich.text.clone(),
    }
}

fn to_embed_refs(embed: PostEmbed) -> Union<RecordEmbedRefs> {
    match embed {
        PostEmbed::Images(list) => {
            let images = list
                .into_iter()
                .map(|image| {
                    images::ImageData {
                        alt: image.alt,
                        aspect_ratio: None,
                        image: image.blob.blob,
                    }
                    .into()
                })
                .collect();
            Union::Refs(RecordEmbedRefs::AppBskyEmbedImagesMain(Box::new(
                images::MainData { images }.into(),
            )))
        }
        PostEmbed::External { card, thumb } => {
            Union::Refs(RecordEmbedRefs::AppBskyEmbedExternalMain(Box::new(
                external::MainData {
                    external: external::ExternalData {
                        description: String::new(),
                        thumb: thumb.map(|uploaded| uploaded.blob),
                        title: card.title,
                        uri: card.link,
                    }
                    .into(),
                }
                .into(),
            )))
        }
    }
}

/// [`SkyClient`] backed by `bsky_sdk::BskyAgent`.
///
/// Login and resume both rebuild the agent from scratch: the SDK binds a
/// session to the agent at construction time, and a failed resume must not
/// leave half-configured state behind.
pub struct BskyClient {
    agent: BskyAgent,
}

impl BskyClient {
    /// Create an unauthenticated client.
    pub async fn connect() -> Result<Self> {
        let agent = BskyAgent::builder().build().await.map_err(|e| {
            ClientError::Network(format!("failed to create agent: {}", e))
        })?;
        Ok(Self { agent })
    }
}

#[async_trait]
impl SkyClient for BskyClient {
    async fn login(&mut self, identifier: &str, password: &str) -> Result<()> {
        tracing::debug!(identifier, "logging in with credentials");

        let agent = BskyAgent::builder().build().await.map_err(|e| {
            ClientError::Network(format!("failed to create agent: {}", e))
        })?;
        agent
            .login(identifier, password)
            .await
            .map_err(|e| map_sdk_error(e, "login"))?;

        self.agent = agent;
        tracing::debug!("session established");
        Ok(())
    }

    async fn resume_session(&mut self, token: &str) -> Result<()> {
        let config: AgentConfig = serde_json::from_str(token)
            .map_err(|e| ClientError::InvalidSession(e.to_string()))?;
        if config.session.is_none() {
            return Err(
                ClientError::InvalidSession("stored config carries no session".to_string()).into(),
            );
        }

        // Building with a session in the config validates it against the
        // server; a stale token surfaces here.
        let agent = BskyAgent::builder()
            .config(config)
            .build()
            .await
            .map_err(|e| map_sdk_error(e, "resume session"))?;

        self.agent = agent;
        tracing::debug!("session resumed");
        Ok(())
    }

    async fn export_session(&self) -> Result<String> {
        let config = self.agent.to_config().await;
        let token = serde_json::to_string(&config)
            .map_err(|e| ClientError::InvalidSession(format!("could not serialize session: {}", e)))?;
        Ok(token)
    }

    async fn upload_blob(&self, bytes: Vec<u8>) -> Result<UploadedBlob> {
        tracing::debug!(size = bytes.len(), "uploading blob");

        let output = self
            .agent
            .api
            .com
            .atproto
            .repo
            .upload_blob(bytes)
            .await
            .map_err(|e| map_sdk_error(e, "upload blob"))?;

        Ok(UploadedBlob {
            blob: output.data.blob,
        })
    }

    async fn create_post(&self, rich: &RichText, embed: Option<PostEmbed>) -> Result<String> {
        tracing::debug!(chars = rich.text.len(), facets = rich.facets.len(), "creating post");

        let response = self
            .agent
            .create_record(to_record(rich, embed))
            .await
            .map_err(|e| map_sdk_error(e, "create post"))?;

        let at_uri = response.uri.to_string();
        tracing::debug!(%at_uri, "post created");
        Ok(at_uri)
    }
}

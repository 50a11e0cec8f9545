//! Post assembly and submission
//!
//! Builds one of the three post shapes (text-only, image-attached,
//! external-card) from a raw message and hands it to the client.
//! Everything is single-shot: network calls are awaited one at a time, and
//! the first failure aborts the whole operation.

use tracing::debug;

use crate::client::{EmbeddedImage, LinkCard, PostEmbed, SkyClient};
use crate::config::FormatOptions;
use crate::error::Result;
use crate::richtext::build_rich_text;

/// Fetch an image's raw bytes over HTTP.
///
/// A non-success status is converted into an error, so a dead image URL
/// fails the post loudly instead of attaching an error page as an image.
pub async fn fetch_image_bytes(url: &str) -> Result<Vec<u8>> {
    debug!(%url, "fetching image");
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Posts formatted messages through an authenticated [`SkyClient`].
pub struct Poster<C> {
    client: C,
    options: FormatOptions,
}

impl<C: SkyClient> Poster<C> {
    pub fn new(client: C, options: FormatOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Text-only post.
    pub async fn post_text(&self, message: &str) -> Result<String> {
        let rich = build_rich_text(message, &self.options);
        self.client.create_post(&rich, None).await
    }

    /// Image-attached post: every URL is fetched, then every payload is
    /// uploaded as a blob, then the post is created with the image list.
    pub async fn post_images(&self, message: &str, image_urls: &[String]) -> Result<String> {
        let rich = build_rich_text(message, &self.options);

        let mut fetched = Vec::with_capacity(image_urls.len());
        for url in image_urls {
            fetched.push(fetch_image_bytes(url).await?);
        }

        let mut images = Vec::with_capacity(fetched.len());
        for bytes in fetched {
            let blob = self.client.upload_blob(bytes).await?;
            images.push(EmbeddedImage {
                blob,
                alt: String::new(),
            });
        }

        self.client
            .create_post(&rich, Some(PostEmbed::Images(images)))
            .await
    }

    /// External-card post. Thumbnail bytes, when supplied, are uploaded
    /// first and referenced from the embed; otherwise the card goes out
    /// without a thumbnail and no upload happens.
    pub async fn post_external(
        &self,
        message: &str,
        card: &LinkCard,
        thumb: Option<Vec<u8>>,
    ) -> Result<String> {
        let rich = build_rich_text(message, &self.options);

        let thumb = match thumb {
            Some(bytes) => Some(self.client.upload_blob(bytes).await?),
            None => None,
        };

        self.client
            .create_post(
                &rich,
                Some(PostEmbed::External {
                    card: card.clone(),
                    thumb,
                }),
            )
            .await
    }
}

//! Rich-text construction for outgoing posts
//!
//! Converts a raw message into the text + facet representation the AT
//! Protocol post record expects: hashtags and URLs are pulled out of the
//! message body and re-appended as facet spans, so clients render them as
//! tappable tags and links.
//!
//! Extraction order is part of the contract: all hashtags are taken out of
//! the whole message first, then URLs are taken out of the remainder, and
//! the rebuilt document lists entities in that removal order rather than
//! their original in-text positions.

use std::sync::LazyLock;

use regex::Regex;

use bsky_sdk::api::app::bsky::richtext::facet;
use bsky_sdk::api::types::Union;

use crate::config::FormatOptions;

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[\w/:%#$&?()~.=+\-]+").unwrap());

/// A post body: final UTF-8 text plus facet spans indexing into it.
#[derive(Debug, Clone, Default)]
pub struct RichText {
    pub text: String,
    pub facets: Vec<facet::Main>,
}

impl RichText {
    /// Facets in the `Option` form the post record wants (`None` when empty).
    pub fn facets(&self) -> Option<Vec<facet::Main>> {
        if self.facets.is_empty() {
            None
        } else {
            Some(self.facets.clone())
        }
    }
}

/// Incrementally builds a [`RichText`], tracking byte offsets as segments
/// are appended. Facet indices are byte ranges into the final UTF-8 text,
/// which stays correct for multi-byte content because offsets are taken
/// from `String::len`.
#[derive(Debug, Default)]
pub struct TextBuilder {
    text: String,
    facets: Vec<facet::Main>,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain-text segment.
    pub fn text(mut self, segment: &str) -> Self {
        self.text.push_str(segment);
        self
    }

    /// Append `display` and cover it with a tag facet for `tag`
    /// (the tag value carries no leading `#`).
    pub fn tag(mut self, display: &str, tag: &str) -> Self {
        let index = self.append(display);
        self.facets.push(
            facet::MainData {
                features: vec![Union::Refs(facet::MainFeaturesItem::Tag(Box::new(
                    facet::TagData {
                        tag: tag.to_string(),
                    }
                    .into(),
                )))],
                index,
            }
            .into(),
        );
        self
    }

    /// Append `display` and cover it with a link facet targeting `uri`.
    pub fn link(mut self, display: &str, uri: &str) -> Self {
        let index = self.append(display);
        self.facets.push(
            facet::MainData {
                features: vec![Union::Refs(facet::MainFeaturesItem::Link(Box::new(
                    facet::LinkData {
                        uri: uri.to_string(),
                    }
                    .into(),
                )))],
                index,
            }
            .into(),
        );
        self
    }

    pub fn build(self) -> RichText {
        RichText {
            text: self.text,
            facets: self.facets,
        }
    }

    fn append(&mut self, segment: &str) -> facet::ByteSlice {
        let byte_start = self.text.len();
        self.text.push_str(segment);
        facet::ByteSliceData {
            byte_end: self.text.len(),
            byte_start,
        }
        .into()
    }
}

/// Build the rich-text document for `message`.
///
/// Hashtags (`#` + word characters) are always extracted; URL extraction
/// and the footer link depend on `options`. Removal trims the surrounding
/// whitespace of the remaining body but does not collapse interior gaps
/// left behind by removed tokens.
pub fn build_rich_text(message: &str, options: &FormatOptions) -> RichText {
    let hashtags: Vec<&str> = HASHTAG.find_iter(message).map(|m| m.as_str()).collect();
    let without_tags = HASHTAG.replace_all(message, "");
    let without_tags = without_tags.trim();

    let (body, links) = if options.detect_links {
        let links: Vec<String> = URL
            .find_iter(without_tags)
            .map(|m| m.as_str().to_string())
            .collect();
        let body = URL.replace_all(without_tags, "").trim().to_string();
        (body, links)
    } else {
        (without_tags.to_string(), Vec::new())
    };

    let mut builder = TextBuilder::new().text(&body);
    for hashtag in &hashtags {
        builder = builder.text(" ").tag(hashtag, hashtag.trim_start_matches('#'));
    }
    for link in &links {
        builder = builder.text(" ").link(link, link);
    }
    if let Some(footer) = &options.footer {
        builder = builder.text("\n").link(&footer.text, &footer.url);
    }

    builder.build()
}

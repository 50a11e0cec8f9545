//! sky-post - Post a message to Bluesky
//!
//! Reads the message from the argument or stdin, formats hashtags/links
//! into rich text, and sends it as a text post, an image post (`--image`,
//! repeatable) or an external-card post (`--card-link`/`--card-title`).
//! Credentials and the optional footer come from the environment
//! (`BSKY_USER_NAME`, `BSKY_APP_PASS`, `FOOTER_TEXT`, `FOOTER_URL`).

use std::io::Read;

use clap::Parser;
use libskycast::logging::{self, LogFormat};
use libskycast::{
    fetch_image_bytes, BskyClient, FormatOptions, LinkCard, Poster, Result, SessionConfig,
    SessionManager, SkycastError,
};

#[derive(Parser, Debug)]
#[command(name = "sky-post", version)]
#[command(about = "Post a message to Bluesky", long_about = None)]
struct Cli {
    /// Message to post (reads from stdin if not provided)
    message: Option<String>,

    /// Image URL to fetch and attach (repeatable)
    #[arg(
        short,
        long = "image",
        value_name = "URL",
        conflicts_with_all = ["card_link", "card_title", "card_thumb"]
    )]
    images: Vec<String>,

    /// Link target for an external card
    #[arg(long, value_name = "URL", requires = "card_title")]
    card_link: Option<String>,

    /// Title for the external card
    #[arg(long, value_name = "TITLE", requires = "card_link")]
    card_title: Option<String>,

    /// Image URL to fetch as the card thumbnail
    #[arg(long, value_name = "URL", requires = "card_link")]
    card_thumb: Option<String>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init(LogFormat::Text, "debug");
    } else {
        logging::init_default();
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let message = match &cli.message {
        Some(message) => message.clone(),
        None => read_stdin()?,
    };
    if message.trim().is_empty() {
        return Err(SkycastError::InvalidInput(
            "message is empty".to_string(),
        ));
    }

    let session_config = SessionConfig::from_env()?;
    let options = FormatOptions::from_env();

    let client = BskyClient::connect().await?;
    let mut manager = SessionManager::new(client, session_config);
    manager.load_or_create().await?;

    let poster = Poster::new(manager.into_client(), options);

    let uri = if !cli.images.is_empty() {
        poster.post_images(&message, &cli.images).await?
    } else if let (Some(link), Some(title)) = (cli.card_link, cli.card_title) {
        let thumb = match &cli.card_thumb {
            Some(url) => Some(fetch_image_bytes(url).await?),
            None => None,
        };
        let card = LinkCard { link, title };
        poster.post_external(&message, &card, thumb).await?
    } else {
        poster.post_text(&message).await?
    };

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::json!({ "uri": uri })),
        _ => println!("{}", uri),
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| SkycastError::InvalidInput(format!("failed to read message from stdin: {}", e)))?;
    Ok(buffer.trim_end().to_string())
}

//! Mock client implementation for testing
//!
//! A configurable [`SkyClient`] that records every call so tests can verify
//! the session-recovery and posting orchestration without credentials or
//! network access. Cloning a `MockClient` shares the recorded state, which
//! lets a test keep a handle after moving the client into a
//! `SessionManager` or `Poster`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use bsky_sdk::api::types::BlobRef;

use crate::client::{PostEmbed, SkyClient, UploadedBlob};
use crate::error::{ClientError, Result};
use crate::richtext::RichText;

/// A fixed, well-formed blob handle. Not a real upload.
pub(crate) fn placeholder_blob() -> UploadedBlob {
    let blob: BlobRef = serde_json::from_value(serde_json::json!({
        "$type": "blob",
        "ref": { "$link": "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi" },
        "mimeType": "application/octet-stream",
        "size": 0,
    }))
    .expect("static blob JSON is valid");
    UploadedBlob { blob }
}

/// One recorded `create_post` call.
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub text: String,
    pub facet_count: usize,
    pub embed: Option<PostEmbed>,
}

#[derive(Debug, Default)]
struct MockState {
    login_calls: usize,
    resume_calls: usize,
    upload_calls: usize,
    post_calls: usize,
    logins: Vec<(String, String)>,
    resumed_with: Vec<String>,
    uploads: Vec<Vec<u8>>,
    posts: Vec<RecordedPost>,
    fail_login: Option<ClientError>,
    fail_resume: Option<ClientError>,
    fail_upload: Option<ClientError>,
    fail_post: Option<ClientError>,
    exported: String,
}

/// Mock client for testing
#[derive(Debug, Clone)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    /// A client where every operation succeeds.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                exported: r#"{"mock":"session"}"#.to_string(),
                ..Default::default()
            })),
        }
    }

    /// Fail every `resume_session` call with `error`.
    pub fn failing_resume(error: ClientError) -> Self {
        let client = Self::new();
        client.state.lock().unwrap().fail_resume = Some(error);
        client
    }

    /// Fail every `login` call with `error`.
    pub fn failing_login(error: ClientError) -> Self {
        let client = Self::new();
        client.state.lock().unwrap().fail_login = Some(error);
        client
    }

    /// Fail every `upload_blob` call with `error`.
    pub fn failing_upload(error: ClientError) -> Self {
        let client = Self::new();
        client.state.lock().unwrap().fail_upload = Some(error);
        client
    }

    /// Fail every `create_post` call with `error`.
    pub fn failing_post(error: ClientError) -> Self {
        let client = Self::new();
        client.state.lock().unwrap().fail_post = Some(error);
        client
    }

    /// Override the token returned by `export_session`.
    pub fn with_exported(self, token: &str) -> Self {
        self.state.lock().unwrap().exported = token.to_string();
        self
    }

    pub fn login_calls(&self) -> usize {
        self.state.lock().unwrap().login_calls
    }

    pub fn resume_calls(&self) -> usize {
        self.state.lock().unwrap().resume_calls
    }

    pub fn upload_calls(&self) -> usize {
        self.state.lock().unwrap().upload_calls
    }

    pub fn post_calls(&self) -> usize {
        self.state.lock().unwrap().post_calls
    }

    /// Identifier/password pairs passed to `login`.
    pub fn logins(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().logins.clone()
    }

    /// Tokens passed to `resume_session`.
    pub fn resumed_with(&self) -> Vec<String> {
        self.state.lock().unwrap().resumed_with.clone()
    }

    /// Byte payloads passed to `upload_blob`.
    pub fn uploads(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().uploads.clone()
    }

    /// Every post that was created.
    pub fn posts(&self) -> Vec<RecordedPost> {
        self.state.lock().unwrap().posts.clone()
    }
}

#[async_trait]
impl SkyClient for MockClient {
    async fn login(&mut self, identifier: &str, password: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.login_calls += 1;
        state
            .logins
            .push((identifier.to_string(), password.to_string()));
        match &state.fail_login {
            Some(error) => Err(error.clone().into()),
            None => Ok(()),
        }
    }

    async fn resume_session(&mut self, token: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.resume_calls += 1;
        state.resumed_with.push(token.to_string());
        match &state.fail_resume {
            Some(error) => Err(error.clone().into()),
            None => Ok(()),
        }
    }

    async fn export_session(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().exported.clone())
    }

    async fn upload_blob(&self, bytes: Vec<u8>) -> Result<UploadedBlob> {
        let mut state = self.state.lock().unwrap();
        state.upload_calls += 1;
        state.uploads.push(bytes);
        match &state.fail_upload {
            Some(error) => Err(error.clone().into()),
            None => Ok(placeholder_blob()),
        }
    }

    async fn create_post(&self, rich: &RichText, embed: Option<PostEmbed>) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.post_calls += 1;
        if let Some(error) = &state.fail_post {
            return Err(error.clone().into());
        }
        state.posts.push(RecordedPost {
            text: rich.text.clone(),
            facet_count: rich.facets.len(),
            embed,
        });
        Ok(format!(
            "at://did:plc:mock/app.bsky.feed.post/{}",
            state.post_calls
        ))
    }
}

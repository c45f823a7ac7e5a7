//! Telegram Bot API client.
//!
//! Covers the handful of methods the bot needs: long polling, file
//! download and replies with text or a document.

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const API_BASE: &str = "https://api.telegram.org";

/// Extra time granted to a request beyond the long-poll timeout.
const REQUEST_SLACK: Duration = Duration::from_secs(30);

/// Errors from the Bot API.
///
/// Request URLs carry the bot token, so they are stripped from HTTP errors
/// before they are stored.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Connection, status or decoding failure
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// The API answered with `ok: false`
    #[error("Telegram API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Http(err.without_url())
    }
}

/// Result type for Bot API calls.
pub type Result<T> = std::result::Result<T, TelegramError>;

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// An incoming update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
    pub document: Option<Attachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A file sent as a document.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    file_path: Option<String>,
}

/// Bot API client bound to one bot token.
pub struct TelegramClient {
    http: reqwest::Client,
    token: String,
    poll_timeout: Duration,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("token", &"<redacted>")
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}

impl TelegramClient {
    /// Create a client. `poll_timeout` is how long `getUpdates` may wait for
    /// new messages.
    pub fn new(token: impl Into<String>, poll_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(poll_timeout + REQUEST_SLACK)
            .build()?;

        Ok(Self {
            http,
            token: token.into(),
            poll_timeout,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    async fn call<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response: ApiResponse<T> = request.send().await?.json().await?;
        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TelegramError::Api(
                description.unwrap_or_else(|| "request was not successful".to_string()),
            )),
        }
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let body = serde_json::json!({
            "offset": offset,
            "timeout": self.poll_timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        self.call(self.http.post(self.method_url("getUpdates")).json(&body))
            .await
    }

    /// Download a file by its id.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let body = serde_json::json!({ "file_id": file_id });
        let info: FileInfo = self
            .call(self.http.post(self.method_url("getFile")).json(&body))
            .await?;
        let path = info
            .file_path
            .ok_or_else(|| TelegramError::Api("file is not available for download".to_string()))?;

        let url = format!("{}/file/bot{}/{}", API_BASE, self.token, path);
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    /// Send a text message.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let body = serde_json::json!({ "chat_id": chat_id, "text": text });
        self.call::<serde_json::Value>(self.http.post(self.method_url("sendMessage")).json(&body))
            .await?;
        Ok(())
    }

    /// Send a `.docx` file.
    pub async fn send_document(&self, chat_id: i64, file_name: &str, data: Vec<u8>) -> Result<()> {
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(rowsize::DOCX_MIME_TYPE)?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);

        self.call::<serde_json::Value>(self.http.post(self.method_url("sendDocument")).multipart(form))
            .await?;
        Ok(())
    }
}

//! Chat bot: receives `.docx` files and replies with the resized copy.

use crate::telegram::{Attachment, Message, TelegramClient, TelegramError, Update};
use rowsize::{is_docx_mime_type, modified_file_name, Transformer};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const GREETING: &str =
    "👋 Hello! Send me a .docx file and I will format the tables inside it for you.";
pub const INVALID_FILE: &str = "⚠️ Please send a valid .docx file.";
pub const PROCESSING: &str = "Processing your document...";
pub const PROCESSING_FAILED: &str = "❌ Sorry, something went wrong while processing your file.";
pub const UNEXPECTED_ERROR: &str = "❌ An unexpected error occurred.";

/// Pause after a failed poll.
pub const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Why a document request failed.
#[derive(Debug, Error)]
pub enum BotError {
    /// The attachment is not a Word document
    #[error("unsupported attachment type {mime:?}")]
    InvalidAttachmentType { mime: String },

    /// The document could not be read or written
    #[error("failed to transform document: {0}")]
    Parse(#[from] rowsize::Error),

    /// Download, upload or API failure
    #[error("transport failure: {0}")]
    Transport(#[from] TelegramError),
}

impl BotError {
    /// Reply shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            BotError::InvalidAttachmentType { .. } => INVALID_FILE,
            BotError::Parse(_) => PROCESSING_FAILED,
            BotError::Transport(_) => UNEXPECTED_ERROR,
        }
    }
}

/// Message transport used by the bot.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Wait for updates after `offset`.
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError>;

    /// Fetch the content of a file.
    async fn download(&self, file_id: &str) -> Result<Vec<u8>, TelegramError>;

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError>;

    async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<(), TelegramError>;
}

impl Transport for TelegramClient {
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        TelegramClient::get_updates(self, offset).await
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>, TelegramError> {
        TelegramClient::download(self, file_id).await
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        TelegramClient::send_message(self, chat_id, text).await
    }

    async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<(), TelegramError> {
        TelegramClient::send_document(self, chat_id, file_name, data).await
    }
}

/// Whether a message is the `/start` command, optionally addressed to a
/// bot (`/start@name`) or followed by arguments.
pub fn is_start_command(text: &str) -> bool {
    match text.split_whitespace().next() {
        Some(command) => command == "/start" || command.starts_with("/start@"),
        None => false,
    }
}

/// Long-polling bot that handles one update at a time.
pub struct Bot<T> {
    transport: T,
    transformer: Arc<Transformer>,
    offset: Option<i64>,
    retry_delay: Duration,
}

impl<T: Transport> Bot<T> {
    pub fn new(transport: T, transformer: Arc<Transformer>) -> Self {
        Self {
            transport,
            transformer,
            offset: None,
            retry_delay: POLL_RETRY_DELAY,
        }
    }

    /// Set the pause after a failed poll.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Poll and handle updates until `shutdown` completes.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        info!(rules = self.transformer.rules().len(), "bot started");

        loop {
            let polled = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                polled = self.transport.get_updates(self.offset) => polled,
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        self.offset = Some(update.update_id + 1);
                        self.handle_update(update).await;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "polling for updates failed");
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
        }

        info!("bot stopped");
    }

    /// Handle one update. Failures are reported to the chat and logged.
    pub async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            debug!(update = update.update_id, "ignoring update without message");
            return;
        };
        self.handle_message(&message).await;
    }

    async fn handle_message(&self, message: &Message) {
        let chat_id = message.chat.id;

        if let Some(attachment) = &message.document {
            debug!(chat = chat_id, message = message.message_id, "document received");
            if let Err(e) = self.process_document(chat_id, attachment).await {
                match &e {
                    BotError::InvalidAttachmentType { .. } => info!(chat = chat_id, error = %e, "rejected attachment"),
                    _ => error!(chat = chat_id, error = %e, "document request failed"),
                }
                self.reply(chat_id, e.user_message()).await;
            }
        } else if message.text.as_deref().is_some_and(is_start_command) {
            self.reply(chat_id, GREETING).await;
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.transport.send_message(chat_id, text).await {
            warn!(chat = chat_id, error = %e, "failed to send reply");
        }
    }

    /// Validate, download, transform and send back one attachment.
    async fn process_document(&self, chat_id: i64, attachment: &Attachment) -> Result<(), BotError> {
        let mime = attachment.mime_type.as_deref().unwrap_or_default();
        if !is_docx_mime_type(mime) {
            return Err(BotError::InvalidAttachmentType {
                mime: mime.to_string(),
            });
        }

        self.transport.send_message(chat_id, PROCESSING).await?;

        let data = self.transport.download(&attachment.file_id).await?;
        debug!(
            chat = chat_id,
            bytes = data.len(),
            announced = attachment.file_size,
            "downloaded document"
        );

        let (output, report) =
            rowsize::transform_bytes_async(data, Arc::clone(&self.transformer)).await?;
        let name = modified_file_name(attachment.file_name.as_deref());
        info!(
            chat = chat_id,
            file = %name,
            tables = report.tables,
            rows = report.resized_rows,
            skipped = report.skipped.len(),
            "document transformed"
        );

        self.transport.send_document(chat_id, &name, output).await?;
        Ok(())
    }
}

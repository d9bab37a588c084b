//! Chat message sources scanned for ticker candidates.
//!
//! | Source | Reads |
//! |--------|-------|
//! | [`TelegramBotSource`] | Bot API `getUpdates` (channel posts and group messages) |
//! | [`TelegramExportSource`] | A Telegram Desktop JSON export (`result.json`) |
//! | [`StaticChatSource`] | Messages held in memory |
//!
//! Every source returns the most recent messages of one channel, newest first.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::data_source::SourceError;
use crate::http_client::{HttpClient, HttpRequest};

/// Number of messages read when nothing else is configured.
pub const DEFAULT_MESSAGE_LIMIT: usize = 100;

/// Public Telegram Bot API endpoint.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Largest page `getUpdates` returns.
const BOT_API_MAX_LIMIT: usize = 100;

/// Text of one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Reads recent messages from a named channel.
pub trait ChatSource: Send + Sync {
    /// Up to `limit` messages of `channel`, newest first.
    fn recent_messages<'a>(
        &'a self,
        channel: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ChatMessage>, SourceError>> + Send + 'a>>;
}

/// Fixed message list; the channel name is ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticChatSource {
    messages: Vec<ChatMessage>,
}

impl StaticChatSource {
    /// `messages` must already be ordered newest first.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// One message per non-empty line, first line treated as newest.
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ChatMessage::new)
                .collect(),
        )
    }
}

impl ChatSource for StaticChatSource {
    fn recent_messages<'a>(
        &'a self,
        _channel: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ChatMessage>, SourceError>> + Send + 'a>> {
        let messages = self.messages.iter().take(limit).cloned().collect();
        Box::pin(async move { Ok(messages) })
    }
}

/// Telegram Bot API reader. The bot must be a member (channel admin for
/// channels) of the chat it reads; only updates still held by Telegram are
/// visible.
///
/// `limit` counts the most recent updates across every chat the bot sees,
/// so a bot in several chats yields fewer than `limit` messages for one
/// channel.
#[derive(Clone)]
pub struct TelegramBotSource {
    http_client: Arc<dyn HttpClient>,
    token: String,
    api_url: String,
    timeout_ms: u64,
}

impl TelegramBotSource {
    pub fn new(http_client: Arc<dyn HttpClient>, token: impl Into<String>) -> Self {
        Self {
            http_client,
            token: token.into(),
            api_url: String::from(TELEGRAM_API_URL),
            timeout_ms: crate::http_client::DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// A negative offset asks for the last updates instead of the earliest
    /// unconfirmed ones.
    fn updates_url(&self, limit: usize) -> String {
        let limit = limit.min(BOT_API_MAX_LIMIT);
        format!(
            "{}/bot{}/getUpdates?limit={limit}&offset=-{limit}&allowed_updates={}",
            self.api_url.trim_end_matches('/'),
            self.token,
            urlencoding::encode(r#"["message","channel_post"]"#)
        )
    }

    async fn fetch_messages(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, SourceError> {
        let request = HttpRequest::get(self.updates_url(limit))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);
        debug!("telegram GET {}", request.redacted_url());

        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("telegram transport error: {}", error.message()))
        })?;

        let updates: BotResponse = serde_json::from_str(&response.body).map_err(|e| {
            SourceError::malformed(format!(
                "failed to parse telegram response (status {}): {e}",
                response.status
            ))
        })?;

        if !updates.ok {
            let description = updates
                .description
                .unwrap_or_else(|| format!("status {}", response.status));
            return Err(SourceError::invalid_request(format!(
                "telegram getUpdates failed: {description}"
            )));
        }

        let mut messages = updates
            .result
            .into_iter()
            .filter_map(|update| update.channel_post.or(update.message))
            .filter(|message| message.chat.matches(channel))
            .map(|message| ChatMessage::new(message.text.or(message.caption).unwrap_or_default()))
            .collect::<Vec<_>>();

        // getUpdates is oldest first
        messages.reverse();
        messages.truncate(limit);
        Ok(messages)
    }
}

impl ChatSource for TelegramBotSource {
    fn recent_messages<'a>(
        &'a self,
        channel: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ChatMessage>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_messages(channel, limit))
    }
}

#[derive(Debug, Deserialize)]
struct BotResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Vec<BotUpdate>,
}

#[derive(Debug, Deserialize)]
struct BotUpdate {
    #[serde(default)]
    message: Option<BotMessage>,
    #[serde(default)]
    channel_post: Option<BotMessage>,
}

#[derive(Debug, Deserialize)]
struct BotMessage {
    chat: BotChat,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    caption: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BotChat {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

impl BotChat {
    fn matches(&self, channel: &str) -> bool {
        let wanted = channel.trim().trim_start_matches('@');
        self.id.to_string() == wanted
            || self
                .username
                .as_deref()
                .is_some_and(|username| username.eq_ignore_ascii_case(wanted))
            || self.title.as_deref().is_some_and(|title| title == wanted)
    }
}

/// Reads a Telegram Desktop JSON export, either a single-chat export or a
/// full account export with a `chats.list` array.
#[derive(Debug, Clone)]
pub struct TelegramExportSource {
    path: PathBuf,
}

impl TelegramExportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_messages(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SourceError::unavailable(format!(
                "failed to read telegram export '{}': {e}",
                self.path.display()
            ))
        })?;
        parse_export(&raw, channel, limit)
    }
}

impl ChatSource for TelegramExportSource {
    fn recent_messages<'a>(
        &'a self,
        channel: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ChatMessage>, SourceError>> + Send + 'a>> {
        Box::pin(self.read_messages(channel, limit))
    }
}

#[derive(Debug, Deserialize)]
struct ExportChat {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    messages: Vec<ExportMessage>,
}

#[derive(Debug, Deserialize)]
struct ExportMessage {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Value,
}

fn parse_export(raw: &str, channel: &str, limit: usize) -> Result<Vec<ChatMessage>, SourceError> {
    let document: Value = serde_json::from_str(raw)
        .map_err(|e| SourceError::malformed(format!("failed to parse telegram export: {e}")))?;

    let list = document.pointer("/chats/list").cloned();
    let chats = match list {
        Some(list) => serde_json::from_value::<Vec<ExportChat>>(list),
        None => serde_json::from_value::<ExportChat>(document).map(|chat| vec![chat]),
    }
    .map_err(|e| SourceError::malformed(format!("unexpected telegram export layout: {e}")))?;

    let wanted = channel.trim().trim_start_matches('@');
    let chat = chats
        .into_iter()
        .find(|chat| {
            chat.name
                .as_deref()
                .is_some_and(|name| name.trim().eq_ignore_ascii_case(wanted))
        })
        .ok_or_else(|| {
            SourceError::invalid_request(format!("chat '{channel}' not found in telegram export"))
        })?;

    // exports list messages oldest first
    Ok(chat
        .messages
        .into_iter()
        .rev()
        .filter(|message| message.kind == "message")
        .take(limit)
        .map(|message| ChatMessage::new(flatten_text(&message.text)))
        .collect())
}

/// Export text is either a string or a list of strings and entity objects.
fn flatten_text(text: &Value) -> String {
    match text {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(text) => Some(text.as_str()),
                Value::Object(entity) => entity.get("text").and_then(Value::as_str),
                _ => None,
            })
            .collect(),
        _ => String::new(),
    }
}

//! Runtime configuration merged from CLI flags and the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use tickerboard_core::adapters::alphavantage::DEFAULT_BASE_URL;
use tickerboard_core::{ChartField, SymbolSource, ValidationError};

use crate::cli::Cli;
use crate::error::CliError;

pub const API_KEY_VAR: &str = "ALPHA_VANTAGE";
pub const BASE_URL_VAR: &str = "ALPHA_VANTAGE_BASE_URL";
pub const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const CHANNEL_VAR: &str = "TELEGRAM_CHANNEL";
pub const BIND_VAR: &str = "TICKERBOARD_BIND";

pub const DEFAULT_BIND: &str = "127.0.0.1:8050";

/// Channel label used when messages come from a plain text file.
const MESSAGES_FILE_CHANNEL: &str = "messages-file";

/// Where chat messages are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatBackend {
    Bot { token: String },
    Export(PathBuf),
    MessagesFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub backend: ChatBackend,
    pub channel: String,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub source: SymbolSource,
    pub chat: Option<ChatConfig>,
    pub chart_fields: Vec<ChartField>,
    pub timeout_ms: u64,
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env(cli: &Cli) -> Result<Self, CliError> {
        Self::resolve(cli, |name| std::env::var(name).ok())
    }

    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let api_key = non_empty(env(API_KEY_VAR)).ok_or_else(|| {
            CliError::config(format!("{API_KEY_VAR} must be set to an Alpha Vantage API key"))
        })?;
        let base_url =
            non_empty(env(BASE_URL_VAR)).unwrap_or_else(|| String::from(DEFAULT_BASE_URL));

        if cli.timeout_ms == 0 {
            return Err(CliError::config("--timeout-ms must be greater than zero"));
        }

        let source = SymbolSource::from(cli.source);
        let chat = if source.needs_chat() {
            Some(resolve_chat(cli, &env)?)
        } else {
            None
        };

        Ok(Self {
            api_key,
            base_url,
            source,
            chat,
            chart_fields: ChartField::parse_list(&cli.chart_fields)?,
            timeout_ms: cli.timeout_ms,
        })
    }
}

fn resolve_chat(cli: &Cli, env: &impl Fn(&str) -> Option<String>) -> Result<ChatConfig, CliError> {
    if cli.message_limit == 0 {
        return Err(ValidationError::ZeroMessageLimit.into());
    }

    let channel = cli
        .channel
        .clone()
        .or_else(|| env(CHANNEL_VAR))
        .map(|channel| channel.trim().to_owned());

    let (backend, channel) = if let Some(path) = &cli.messages_file {
        let channel = channel
            .filter(|channel| !channel.is_empty())
            .unwrap_or_else(|| String::from(MESSAGES_FILE_CHANNEL));
        (ChatBackend::MessagesFile(path.clone()), channel)
    } else {
        let channel = match channel {
            Some(channel) if !channel.is_empty() => channel,
            Some(_) => return Err(ValidationError::EmptyChannel.into()),
            None => {
                return Err(CliError::config(format!(
                    "--source {} needs --channel or {CHANNEL_VAR}",
                    SymbolSource::from(cli.source)
                )))
            }
        };

        let backend = match &cli.telegram_export {
            Some(path) => ChatBackend::Export(path.clone()),
            None => {
                let token = non_empty(env(BOT_TOKEN_VAR)).ok_or_else(|| {
                    CliError::config(format!(
                        "chat sources need --telegram-export, --messages-file or {BOT_TOKEN_VAR}"
                    ))
                })?;
                ChatBackend::Bot { token }
            }
        };
        (backend, channel)
    };

    Ok(ChatConfig {
        backend,
        channel,
        limit: cli.message_limit,
    })
}

/// Listen address: flag, then `TICKERBOARD_BIND`, then the default.
pub fn resolve_bind(
    flag: Option<SocketAddr>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SocketAddr, CliError> {
    if let Some(addr) = flag {
        return Ok(addr);
    }
    let raw = non_empty(env(BIND_VAR)).unwrap_or_else(|| String::from(DEFAULT_BIND));
    raw.parse()
        .map_err(|error| CliError::config(format!("invalid bind address '{raw}': {error}")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

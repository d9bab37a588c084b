mod scan;
mod serve;
mod show;
mod symbols;

use std::sync::Arc;

use log::info;
use tickerboard_core::{
    build_catalog, AlphaVantageAdapter, ChatScan, ChatSource, HttpClient, ReqwestHttpClient,
    StaticChatSource, SymbolCatalog, TelegramBotSource, TelegramExportSource,
};

use crate::cli::{Cli, Command};
use crate::config::{AppConfig, ChatBackend};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let text = match &cli.command {
        Command::Scan(args) => scan::run(args, cli.format, cli.pretty).await?,
        Command::Serve(args) => {
            let config = AppConfig::from_env(cli)?;
            serve::run(args, &config).await?;
            return Ok(());
        }
        Command::Symbols => {
            let config = AppConfig::from_env(cli)?;
            symbols::run(&config, cli.format, cli.pretty).await?
        }
        Command::Show(args) => {
            let config = AppConfig::from_env(cli)?;
            show::run(args, &config, cli.format, cli.pretty).await?
        }
    };

    println!("{text}");
    Ok(())
}

/// Provider adapter and startup catalog shared by the network commands.
pub struct Startup {
    pub provider: Arc<AlphaVantageAdapter>,
    pub catalog: SymbolCatalog,
}

pub async fn startup(config: &AppConfig) -> Result<Startup, CliError> {
    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let provider = Arc::new(
        AlphaVantageAdapter::new(Arc::clone(&http_client), config.api_key.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout_ms(config.timeout_ms),
    );

    let catalog = match &config.chat {
        None => build_catalog(config.source, provider.as_ref(), None).await?,
        Some(chat) => {
            let source = chat_source(&chat.backend, http_client, config.timeout_ms).await?;
            let scan = ChatScan {
                source: source.as_ref(),
                channel: &chat.channel,
                limit: chat.limit,
            };
            build_catalog(config.source, provider.as_ref(), Some(scan)).await?
        }
    };

    if catalog.is_empty() {
        info!("symbol catalog is empty; the dropdown will have no options");
    }

    Ok(Startup { provider, catalog })
}

async fn chat_source(
    backend: &ChatBackend,
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
) -> Result<Box<dyn ChatSource>, CliError> {
    let source: Box<dyn ChatSource> = match backend {
        ChatBackend::Bot { token } => Box::new(
            TelegramBotSource::new(http_client, token.clone()).with_timeout_ms(timeout_ms),
        ),
        ChatBackend::Export(path) => Box::new(TelegramExportSource::new(path.clone())),
        ChatBackend::MessagesFile(path) => {
            let text = tokio::fs::read_to_string(path).await?;
            Box::new(StaticChatSource::from_lines(&text))
        }
    };
    Ok(source)
}

//! CLI argument definitions for tickerboard.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the dashboard web server |
//! | `symbols` | Print the symbol catalog for the selected source |
//! | `scan` | Extract ticker candidates from text |
//! | `show` | Render one dashboard selection to stdout |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--source` | `listing` | Where dropdown symbols come from |
//! | `--channel` | `$TELEGRAM_CHANNEL` | Chat channel scanned by `chat-*` sources |
//! | `--message-limit` | `100` | Number of recent chat messages to scan |
//! | `--chart-fields` | `open,high,low,close` | Chart lines, in order |
//! | `--timeout-ms` | `10000` | Request timeout in ms |
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! tickerboard serve --bind 0.0.0.0:8050
//! tickerboard --source chat-listing --channel my_channel symbols --format table
//! tickerboard scan messages.txt
//! tickerboard show IBM --pretty
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickerboard_core::{SymbolSource, DEFAULT_MESSAGE_LIMIT};

/// Stock ticker dashboard backed by Alpha Vantage.
#[derive(Debug, Parser)]
#[command(
    name = "tickerboard",
    author,
    version,
    about = "Stock ticker dashboard backed by Alpha Vantage",
    long_about = "Tickerboard serves a single-page dashboard with a symbol dropdown, a daily \
price chart, the latest quote and recent news.\n\
\n\
The dropdown is filled from the Alpha Vantage listing feed, or from tickers mentioned in a \
Telegram channel. Set ALPHA_VANTAGE to your API key (a .env file works too).\n\
\n\
Use 'tickerboard <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Where dropdown symbols come from.
    #[arg(long, global = true, value_enum, default_value_t = SourceSelector::Listing)]
    pub source: SourceSelector,

    /// Chat channel to scan (username, title or numeric id).
    #[arg(long, global = true)]
    pub channel: Option<String>,

    /// Read chat messages from a Telegram Desktop JSON export.
    #[arg(long, global = true, conflicts_with = "messages_file")]
    pub telegram_export: Option<PathBuf>,

    /// Read chat messages from a text file, one message per line.
    #[arg(long, global = true)]
    pub messages_file: Option<PathBuf>,

    /// Number of most recent chat messages to scan.
    #[arg(long, global = true, default_value_t = DEFAULT_MESSAGE_LIMIT)]
    pub message_limit: usize,

    /// Comma-separated chart lines (open, high, low, close, adjusted-close).
    #[arg(long, global = true, default_value = "open,high,low,close")]
    pub chart_fields: String,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text table for terminal display.
    Table,
    /// Single JSON document.
    Json,
}

/// Symbol catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Every active symbol of the listing feed.
    Listing,
    /// Chat tickers that appear in the listing feed.
    ChatListing,
    /// Chat tickers confirmed one by one with a company overview lookup.
    ChatLookup,
}

impl From<SourceSelector> for SymbolSource {
    fn from(value: SourceSelector) -> Self {
        match value {
            SourceSelector::Listing => Self::Listing,
            SourceSelector::ChatListing => Self::ChatListing,
            SourceSelector::ChatLookup => Self::ChatLookup,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the dashboard web server.
    ///
    /// # Examples
    ///
    ///   tickerboard serve
    ///   tickerboard serve --bind 0.0.0.0:8050
    Serve(ServeArgs),

    /// Print the symbol catalog the dropdown would offer.
    Symbols,

    /// Extract ticker candidates from text (a file or stdin).
    ///
    /// No network access; useful to check what a chat scan would pick up.
    Scan(ScanArgs),

    /// Render the dashboard for one symbol.
    ///
    /// # Examples
    ///
    ///   tickerboard show IBM
    ///   tickerboard show MSFT --format table
    Show(ShowArgs),
}

/// Arguments for `serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (defaults to $TICKERBOARD_BIND or 127.0.0.1:8050).
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

/// Arguments for `scan`.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Text file to scan; reads stdin when omitted.
    pub file: Option<PathBuf>,

    /// Drop repeated candidates, keeping first occurrences.
    #[arg(long, default_value_t = false)]
    pub unique: bool,
}

/// Arguments for `show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Symbol to render; must be in the catalog.
    pub symbol: String,
}

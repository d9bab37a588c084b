use tokio::io::{AsyncRead, AsyncReadExt};

use tickerboard_core::scan::{dedup_candidates, extract_candidates};

use crate::cli::{OutputFormat, ScanArgs};
use crate::error::CliError;
use crate::output;

pub async fn run(args: &ScanArgs, format: OutputFormat, pretty: bool) -> Result<String, CliError> {
    let text = match &args.file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => read_all(tokio::io::stdin()).await?,
    };

    let candidates = scan_text(&text, args.unique);
    output::render_candidates(&candidates, format, pretty)
}

async fn read_all(mut reader: impl AsyncRead + Unpin) -> std::io::Result<String> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer).await?;
    Ok(buffer)
}

fn scan_text(text: &str, unique: bool) -> Vec<String> {
    let candidates = extract_candidates(text);
    if unique {
        dedup_candidates(&candidates)
    } else {
        candidates
    }
}

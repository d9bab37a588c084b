use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::error::CliError;
use crate::output;

use super::startup;

pub async fn run(config: &AppConfig, format: OutputFormat, pretty: bool) -> Result<String, CliError> {
    let startup = startup(config).await?;
    output::render_catalog(config.source, &startup.catalog, format, pretty)
}

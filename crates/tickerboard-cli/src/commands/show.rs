use std::sync::Arc;

use tickerboard_core::{DashboardService, Symbol};

use crate::cli::{OutputFormat, ShowArgs};
use crate::config::AppConfig;
use crate::error::CliError;
use crate::output;

use super::startup;

pub async fn run(
    args: &ShowArgs,
    config: &AppConfig,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let startup = startup(config).await?;

    let dashboard = DashboardService::new(startup.provider, Arc::new(startup.catalog))
        .with_chart_fields(config.chart_fields.clone());
    let view = dashboard.render(&symbol).await?;

    output::render_view(&view, format, pretty)
}

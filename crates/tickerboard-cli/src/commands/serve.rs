use std::sync::Arc;

use log::info;
use tickerboard_core::DashboardService;
use tickerboard_web::AppState;

use crate::cli::ServeArgs;
use crate::config::{resolve_bind, AppConfig};
use crate::error::CliError;

use super::startup;

pub async fn run(args: &ServeArgs, config: &AppConfig) -> Result<(), CliError> {
    let addr = resolve_bind(args.bind, |name| std::env::var(name).ok())?;
    let startup = startup(config).await?;

    info!(
        "serving {} symbols from source '{}' on http://{addr}",
        startup.catalog.len(),
        config.source
    );

    let dashboard = DashboardService::new(startup.provider, Arc::new(startup.catalog))
        .with_chart_fields(config.chart_fields.clone());
    tickerboard_web::serve(addr, AppState::new(dashboard)).await?;
    Ok(())
}

use super::Context;
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use libby_monitor_core::report;
use libby_monitor_sources::{CatalogueSource, ThunderClient};
use std::process::ExitCode;
use tracing::error;

pub async fn run_search(ctx: &Context, library: &str, query: &str, output: &Output) -> Result<ExitCode> {
    let config = ctx.load_config()?;
    let client = ThunderClient::new(&config.catalogue).wrap_err("Failed to build catalogue client")?;
    Ok(search(&client, library, query, output).await)
}

pub async fn search(source: &dyn CatalogueSource, library: &str, query: &str, output: &Output) -> ExitCode {
    if output.is_human() {
        output.println(format!("Searching \"{}\" in {}...\n", query, library));
    }

    match source.search(library, query).await {
        Ok(response) => {
            if output.is_human() {
                output.lines(&report::search_lines(&response));
            } else {
                output.json(&serde_json::to_value(&response).unwrap_or_default());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(operation = "search", library, query, error = %e, "Catalogue search failed");
            output.error(format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

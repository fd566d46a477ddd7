use super::Context;
use crate::output::Output;
use color_eyre::Result;
use libby_monitor_core::report;
use std::process::ExitCode;

pub fn run_list(ctx: &Context, output: &Output) -> Result<ExitCode> {
    let store = ctx.store()?;
    let watchlist = store.load()?;

    if output.is_human() {
        output.lines(&report::list_lines(&watchlist, store.profile()));
    } else {
        output.json(&serde_json::to_value(&watchlist)?);
    }

    Ok(ExitCode::SUCCESS)
}

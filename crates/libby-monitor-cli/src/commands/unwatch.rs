use super::Context;
use crate::output::Output;
use color_eyre::Result;
use serde_json::json;
use std::process::ExitCode;
use tracing::info;

pub fn run_unwatch(ctx: &Context, title: &str, output: &Output) -> Result<ExitCode> {
    let removed = remove_from_watchlist(ctx, title)?;

    if !output.is_human() {
        output.json(&json!({ "removed": removed > 0, "title": title }));
    } else if removed > 0 {
        output.success(format!("Removed: {}", title));
    } else {
        output.warn(format!("Not found in watchlist: {}", title));
    }

    Ok(if removed > 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Number of entries removed. The file is only rewritten when something changed.
pub(crate) fn remove_from_watchlist(ctx: &Context, title: &str) -> Result<usize> {
    let store = ctx.store()?;
    let mut watchlist = store.load()?;

    let removed = watchlist.unwatch(title);
    if removed > 0 {
        store.save(&watchlist)?;
        info!(operation = "unwatch", title, profile = ?ctx.profile, "Book removed from watchlist");
    }
    Ok(removed)
}

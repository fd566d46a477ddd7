use super::Context;
use crate::output::Output;
use chrono::Local;
use color_eyre::Result;
use libby_monitor_models::WatchlistEntry;
use serde_json::json;
use std::process::ExitCode;
use tracing::info;

pub fn run_watch(
    ctx: &Context,
    title: &str,
    author: Option<String>,
    library: Option<String>,
    output: &Output,
) -> Result<ExitCode> {
    let config = ctx.load_config()?;
    let library = library.unwrap_or_else(|| config.default_library.clone());
    let author = author.unwrap_or_default();

    let added = add_to_watchlist(ctx, title, &author, &library)?;

    if !output.is_human() {
        output.json(&json!({
            "added": added,
            "title": title,
            "author": author,
            "library": library,
        }));
        return Ok(ExitCode::SUCCESS);
    }

    if !added {
        output.println(format!("Already watching: {}", title));
        return Ok(ExitCode::SUCCESS);
    }

    output.success(format!("Added to watchlist: {}", title));
    if !author.is_empty() {
        output.println(format!("  Author: {}", author));
    }
    match config.library_name(&library) {
        Some(name) => output.println(format!("  Library: {} ({})", library, name)),
        None => output.println(format!("  Library: {}", library)),
    }

    Ok(ExitCode::SUCCESS)
}

/// Returns false without touching the file when the title is already watched
pub(crate) fn add_to_watchlist(ctx: &Context, title: &str, author: &str, library: &str) -> Result<bool> {
    let store = ctx.store()?;
    let mut watchlist = store.load()?;

    let entry = WatchlistEntry::new(title, author, library, Local::now().date_naive());
    if !watchlist.watch(entry) {
        return Ok(false);
    }

    store.save(&watchlist)?;
    info!(operation = "watch", title, library, profile = ?ctx.profile, "Book added to watchlist");
    Ok(true)
}

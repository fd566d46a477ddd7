use super::check_ui::{is_interactive, CheckUI};
use super::Context;
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use libby_monitor_core::report::{self, CheckReport, ReportMode};
use libby_monitor_core::{CheckOutcome, FixedIntervalPacer, Pacer, Reconciler, WatchlistStore};
use libby_monitor_sources::{CatalogueSource, ThunderClient};
use std::process::ExitCode;
use tracing::info;

pub async fn run_check(ctx: &Context, notify: bool, output: &Output) -> Result<ExitCode> {
    let config = ctx.load_config()?;
    let store = ctx.store()?;
    let client = ThunderClient::new(&config.catalogue).wrap_err("Failed to build catalogue client")?;
    let pacer = FixedIntervalPacer::new(config.catalogue.rate_limit());

    let mode = if notify { ReportMode::Notify } else { ReportMode::Full };
    let show_progress = mode == ReportMode::Full && output.is_human() && !output.is_quiet() && is_interactive();

    check_once(&store, &client, &pacer, mode, show_progress, output).await?;

    // Per-book failures are logged and skipped, they never fail the command
    Ok(ExitCode::SUCCESS)
}

/// Load, reconcile, save and report one round. Shared by `check` and the daemon.
pub async fn check_once(
    store: &WatchlistStore,
    source: &dyn CatalogueSource,
    pacer: &dyn Pacer,
    mode: ReportMode,
    show_progress: bool,
    output: &Output,
) -> Result<CheckReport> {
    let mut watchlist = store.load()?;

    let outcome = if watchlist.is_empty() {
        CheckOutcome::default()
    } else {
        let ui = show_progress.then(|| CheckUI::new(watchlist.len()));
        let mut reconciler = Reconciler::new(source, pacer);
        if let Some(ui) = &ui {
            reconciler = reconciler.with_progress(ui.progress_fn());
        }

        let outcome = reconciler.reconcile(&mut watchlist).await;
        if let Some(ui) = &ui {
            ui.finish();
        }

        store.save(&watchlist)?;
        outcome
    };

    info!(
        operation = "check_complete",
        profile = ?store.profile(),
        checked = outcome.checked,
        failed = outcome.failed,
        new_finds = outcome.new_finds.len(),
        "Check completed"
    );

    let check_report = CheckReport::new(&outcome, &watchlist);
    if output.is_human() {
        output.lines(&report::check_lines(&outcome, &watchlist, mode));
    } else if emits_json(mode, &check_report) {
        output.json(&serde_json::to_value(&check_report)?);
    }

    Ok(check_report)
}

/// Notify runs stay silent only when there is nothing new and nothing found
fn emits_json(mode: ReportMode, check_report: &CheckReport) -> bool {
    mode == ReportMode::Full
        || !check_report.new_finds.is_empty()
        || !check_report.in_catalogue.is_empty()
}

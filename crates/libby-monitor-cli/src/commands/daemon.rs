use super::check::check_once;
use super::Context;
use crate::output::Output;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use libby_monitor_core::{FixedIntervalPacer, ReportMode, WatchlistStore};
use libby_monitor_sources::ThunderClient;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

/// Everything a scheduled check needs, shared between cron ticks
struct CheckRunner {
    store: WatchlistStore,
    client: ThunderClient,
    pacer: FixedIntervalPacer,
    output: Output,
    running: Mutex<()>,
}

impl CheckRunner {
    async fn run(&self, trigger: &'static str) {
        // A slow round must not overlap the next tick
        let Ok(_guard) = self.running.try_lock() else {
            warn!(operation = "scheduled_check_skipped", trigger, "Previous check still running, skipping this tick");
            return;
        };

        info!(operation = "scheduled_check_start", trigger, "Starting check");
        match check_once(&self.store, &self.client, &self.pacer, ReportMode::Notify, false, &self.output).await {
            Ok(report) => {
                info!(
                    operation = "scheduled_check_complete",
                    trigger,
                    checked = report.checked,
                    failed = report.failed,
                    new_finds = report.new_finds.len(),
                    "Check completed"
                );
            }
            Err(e) => {
                error!(operation = "scheduled_check_error", trigger, error = %e, "Check failed");
            }
        }
    }
}

pub async fn run_daemon(
    ctx: &Context,
    schedule: Option<String>,
    no_startup_check: bool,
    output: &Output,
) -> Result<ExitCode> {
    let config = ctx.load_config()?;
    let schedule = schedule.unwrap_or_else(|| config.scheduler.schedule.clone());

    let runner = Arc::new(CheckRunner {
        store: ctx.store()?,
        client: ThunderClient::new(&config.catalogue).wrap_err("Failed to build catalogue client")?,
        pacer: FixedIntervalPacer::new(config.catalogue.rate_limit()),
        output: *output,
        running: Mutex::new(()),
    });

    let job_runner = runner.clone();
    let job = Job::new_async(schedule.as_str(), move |_uuid, _lock| {
        let runner = job_runner.clone();
        Box::pin(async move {
            runner.run("schedule").await;
        })
    })
    .map_err(|e| eyre!("Invalid cron schedule '{}': {}", schedule, e))?;

    if config.scheduler.run_on_startup && !no_startup_check {
        info!(operation = "scheduler_startup", "Running initial check on startup");
        runner.run("startup").await;
    }

    let mut scheduler = JobScheduler::new().await.wrap_err("Failed to create scheduler")?;
    scheduler.add(job).await.wrap_err("Failed to register check job")?;
    scheduler.start().await.wrap_err("Failed to start scheduler")?;

    info!(
        operation = "scheduler_started",
        schedule = %schedule,
        profile = ?ctx.profile,
        "Scheduler started (cron times are UTC)"
    );

    tokio::signal::ctrl_c().await.wrap_err("Failed to listen for Ctrl-C")?;

    info!(operation = "scheduler_shutdown", "Shutting down");
    scheduler.shutdown().await.wrap_err("Failed to stop scheduler")?;

    Ok(ExitCode::SUCCESS)
}

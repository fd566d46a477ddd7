use indicatif::{ProgressBar, ProgressStyle};
use libby_monitor_core::reconcile::ProgressFn;
use libby_monitor_models::WatchlistEntry;
use std::io::IsTerminal;

/// Progress bar for an interactive `check` run. Drawn on stderr so stdout
/// only carries the report.
pub struct CheckUI {
    bar: ProgressBar,
}

impl CheckUI {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_message("Starting check...");
        Self { bar }
    }

    /// Callback for the reconciler that advances the bar before each query
    pub fn progress_fn(&self) -> ProgressFn {
        let bar = self.bar.clone();
        Box::new(move |idx: usize, _total: usize, entry: &WatchlistEntry| {
            bar.set_position(idx as u64);
            bar.set_message(format!("Checking {}", entry.title));
        })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

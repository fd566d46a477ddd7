use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use commands::{check, config, daemon, list, search, unwatch, watch, Context};
use libby_monitor_config::PathManager;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "libby-book-monitor")]
#[command(about = "Watch Libby/OverDrive library catalogues for books you want to read")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Profile name; each profile keeps its own watchlist
    #[arg(long, global = true, value_name = "NAME")]
    profile: Option<String>,

    /// Data directory (default: $LIBBY_BOOK_MONITOR_DATA or ~/.libby-book-monitor)
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a library catalogue
    Search {
        /// Library code, e.g. telaviv
        library: String,

        /// Free-text query
        query: String,
    },
    /// Add a book to the watchlist
    Watch {
        title: String,

        #[arg(long)]
        author: Option<String>,

        /// Library code (defaults to the configured default library)
        #[arg(long)]
        library: Option<String>,
    },
    /// Remove a book from the watchlist
    Unwatch {
        title: String,
    },
    /// Show the watchlist
    List,
    /// Check every watched book against its library catalogue
    #[command(long_about = "Query the catalogue for every book on the watchlist and record which ones the library now owns. With --notify, nothing is printed unless a book became available since the last check, which suits cron jobs.")]
    Check {
        /// Only print when something new was found
        #[arg(long, action = ArgAction::SetTrue)]
        notify: bool,
    },
    /// Run checks on a schedule until interrupted
    #[command(long_about = "Run as a long-lived process that performs a notify-mode check on the configured cron schedule. Schedules use six fields including seconds and are evaluated in UTC.")]
    Daemon {
        /// Cron schedule expression (e.g. '0 0 */6 * * *' for every 6 hours)
        #[arg(long, value_name = "SCHEDULE")]
        schedule: Option<String>,

        /// Skip the check normally run on startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_check: bool,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set the library used when `watch` gets no --library
    SetDefault {
        library: String,
    },
    /// Register a display name for a library code
    AddLibrary {
        code: String,
        name: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::resolve(cli.data_dir).wrap_err("Failed to resolve data directory")?;

    // The daemon outlives the terminal it was started from, so it also logs to a file
    let log_file = matches!(cli.command, Commands::Daemon { .. }).then(|| paths.daemon_log_file());
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let ctx = Context::new(paths, cli.profile);

    match cli.command {
        Commands::Search { library, query } => search::run_search(&ctx, &library, &query, &output).await,
        Commands::Watch { title, author, library } => watch::run_watch(&ctx, &title, author, library, &output),
        Commands::Unwatch { title } => unwatch::run_unwatch(&ctx, &title, &output),
        Commands::List => list::run_list(&ctx, &output),
        Commands::Check { notify } => check::run_check(&ctx, notify, &output).await,
        Commands::Daemon { schedule, no_startup_check } => {
            daemon::run_daemon(&ctx, schedule, no_startup_check, &output).await
        }
        Commands::Config { cmd } => config::run_config(&ctx, cmd.unwrap_or(ConfigCommands::Show), &output),
    }
}

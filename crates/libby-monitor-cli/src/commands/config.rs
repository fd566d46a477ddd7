use super::Context;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use libby_monitor_config::Config;
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing::info;

pub fn run_config(ctx: &Context, cmd: ConfigCommands, output: &Output) -> Result<ExitCode> {
    match cmd {
        ConfigCommands::Show => show_config(ctx, output),
        ConfigCommands::SetDefault { library } => set_default(ctx, &library, output),
        ConfigCommands::AddLibrary { code, name } => add_library(ctx, &code, &name, output),
    }
}

fn show_config(ctx: &Context, output: &Output) -> Result<ExitCode> {
    let config = ctx.load_config()?;

    if !output.is_human() {
        output.json(&serde_json::to_value(&config)?);
        return Ok(ExitCode::SUCCESS);
    }
    if output.is_quiet() {
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Paths".bright_cyan().bold());
    println!("  Config file:    {}", ctx.paths.config_file().display());
    match ctx.store() {
        Ok(store) => println!("  Watchlist:      {}", store.path().display()),
        Err(e) => println!("  Watchlist:      {}", e.to_string().red()),
    }
    println!();

    println!("{}", "Libraries".bright_cyan().bold());
    if config.libraries.is_empty() {
        println!("  {} {}", "*".green(), config.default_library);
    }
    for (code, name) in &config.libraries {
        let marker = if *code == config.default_library { "*".green().to_string() } else { " ".to_string() };
        println!("  {} {} ({})", marker, code, name);
    }
    if !config.libraries.is_empty() && config.library_name(&config.default_library).is_none() {
        println!("  {} {}", "*".green(), config.default_library);
    }
    println!();

    println!("{}", "Catalogue".bright_cyan().bold());
    println!("  API base:       {}", config.catalogue.api_base);
    println!("  User agent:     {}", config.catalogue.user_agent);
    println!("  Timeout:        {}s", config.catalogue.timeout_secs);
    println!("  Rate limit:     {}ms", config.catalogue.rate_limit_ms);
    println!();

    println!("{}", "Daemon".bright_cyan().bold());
    println!("  Schedule:       {} (UTC)", config.scheduler.schedule);
    println!("  Run on startup: {}", config.scheduler.run_on_startup);

    Ok(ExitCode::SUCCESS)
}

fn set_default(ctx: &Context, library: &str, output: &Output) -> Result<ExitCode> {
    let mut config = ctx.load_config()?;
    config.set_default_library(library);
    save(ctx, &config)?;

    info!(operation = "config_set_default", library, "Default library changed");
    output.success(format!("Default library set to {}", library));
    if config.library_name(library).is_none() {
        output.warn(format!(
            "'{}' has no display name yet; add one with 'config add-library {} <name>'",
            library, library
        ));
    }
    Ok(ExitCode::SUCCESS)
}

fn add_library(ctx: &Context, code: &str, name: &str, output: &Output) -> Result<ExitCode> {
    let mut config = ctx.load_config()?;
    config.add_library(code, name);
    save(ctx, &config)?;

    info!(operation = "config_add_library", code, name, "Library added");
    output.success(format!("Added library {} ({})", code, name));
    Ok(ExitCode::SUCCESS)
}

fn save(ctx: &Context, config: &Config) -> Result<()> {
    config.validate()?;
    let path = ctx.paths.config_file();
    config
        .save_to_file(&path)
        .wrap_err_with(|| format!("Failed to save configuration to {}", path.display()))
}

// ABOUTME: Main entry point for the paired CLI application
// ABOUTME: Parses arguments, loads configuration, and dispatches fetch, compare, and completions

use anyhow::{Context, Result};
use clap::Parser;
use paired_cli::app::{build_fetcher, run_compare, run_fetch, FetchOptions};
use paired_cli::cli::{Cli, Commands};
use paired_cli::cli_output::CliOutput;
use paired_cli::completions::write_completions;
use paired_cli::config::{Config, Format, Settings};
use paired_cli::constants;
use paired_cli::output::formatter_for;
use paired_sdk::{ResourceEndpoints, ResourceId};
use std::env;
use std::io::IsTerminal;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_settings(cli: &Cli, base_url: Option<&str>) -> Result<Settings> {
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    let mut settings = config.settings()?;

    if let Some(url) = base_url {
        settings.endpoints = ResourceEndpoints::new(url)
            .with_context(|| format!("Invalid --base-url: {}", url))?;
    }
    Ok(settings)
}

async fn run(cli: Cli, use_color: bool) -> Result<bool> {
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Commands::Fetch {
            id,
            strategy,
            base_url,
            json,
            pretty,
            save,
        } => {
            let settings = load_settings(&cli, base_url.as_deref())?;
            let format = if *json { Format::Json } else { settings.format };
            let as_json = format == Format::Json;
            let formatter = formatter_for(format, *pretty, use_color);

            let options = FetchOptions {
                id: ResourceId(*id),
                strategy: strategy.unwrap_or(settings.strategy),
                save: save.clone(),
                show_progress: !as_json
                    && std::io::stderr().is_terminal()
                    && env::var_os(constants::env::QUIET).is_none(),
                use_color,
            };

            let fetcher = build_fetcher(&settings)?;
            run_fetch(&fetcher, &options, formatter.as_ref(), &mut stdout).await
        }
        Commands::Compare { id, base_url } => {
            let settings = load_settings(&cli, base_url.as_deref())?;
            let formatter = formatter_for(settings.format, false, use_color);

            let fetcher = build_fetcher(&settings)?;
            run_compare(&fetcher, ResourceId(*id), formatter.as_ref(), &mut stdout).await
        }
        Commands::Completions { shell } => {
            write_completions(*shell, &mut stdout)?;
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Determine if color should be used
    let use_color = !cli.no_color
        && (cli.force_color
            || (env::var("NO_COLOR").is_err()
                && env::var("TERM").unwrap_or_default() != "dumb"
                && std::io::stdout().is_terminal()));
    let output = CliOutput::with_color(use_color && std::io::stderr().is_terminal());

    match run(cli, use_color).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

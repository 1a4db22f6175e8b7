// ABOUTME: Command runners for fetch and compare, shared by the binary and integration tests
// ABOUTME: Builds the fetcher from settings and renders outcomes through a channel sink

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use paired_sdk::{ChannelSink, HttpTransport, PairedFetcher, ResourceId, Strategy, Transport};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::cli_output::CliOutput;
use crate::config::Settings;
use crate::constants::timeouts::PROGRESS_TICK_MS;
use crate::output::OutputFormat;
use crate::types::{Comparison, FetchReport};

/// Options for one `paired fetch` run
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub id: ResourceId,
    pub strategy: Strategy,
    pub save: Option<PathBuf>,
    pub show_progress: bool,
    pub use_color: bool,
}

/// Build an HTTP-backed fetcher. Must be called inside a tokio runtime.
pub fn build_fetcher(settings: &Settings) -> Result<PairedFetcher<HttpTransport>> {
    let transport = match settings.timeout {
        Some(timeout) => HttpTransport::builder().timeout(timeout).build(),
        None => HttpTransport::new(),
    }
    .context("Failed to create HTTP transport")?;

    let fetcher = PairedFetcher::new(transport, settings.endpoints.clone())?
        .with_handshake_wait(settings.handshake_wait);
    Ok(fetcher)
}

fn spinner(enabled: bool, message: String) -> Result<ProgressBar> {
    if !enabled {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
    Ok(pb)
}

/// Fetch one resource and write the rendered outcome. Returns whether the
/// fetch succeeded.
pub async fn run_fetch<T: Transport, W: Write>(
    fetcher: &PairedFetcher<T>,
    options: &FetchOptions,
    formatter: &dyn OutputFormat,
    out: &mut W,
) -> Result<bool> {
    let progress = spinner(
        options.show_progress,
        format!("Fetching resource {} ({})", options.id, options.strategy),
    )?;

    let (sink, mut outcomes) = ChannelSink::new();
    fetcher.deliver(options.id, options.strategy, &sink).await;
    drop(sink);

    let (id, outcome) = outcomes
        .recv()
        .await
        .context("Fetch finished without delivering an outcome")?;
    progress.finish_and_clear();
    log::debug!("Resource {} finished, success: {}", id, outcome.is_ok());

    if let (Some(path), Ok(resource)) = (&options.save, &outcome) {
        resource
            .image()
            .as_dynamic()
            .save(path)
            .with_context(|| format!("Failed to save image to {}", path.display()))?;
        CliOutput::with_color(options.use_color).saved(path);
    }

    let report = FetchReport::from_outcome(id, options.strategy, &outcome);
    writeln!(out, "{}", formatter.format_report(&report)?)?;
    Ok(report.is_success())
}

/// Fetch one resource with every strategy in turn and write a comparison.
/// Returns whether all strategies produced the same outcome.
pub async fn run_compare<T: Transport, W: Write>(
    fetcher: &PairedFetcher<T>,
    id: ResourceId,
    formatter: &dyn OutputFormat,
    out: &mut W,
) -> Result<bool> {
    let mut runs = Vec::with_capacity(Strategy::ALL.len());
    for strategy in Strategy::ALL {
        let started = Instant::now();
        let outcome = fetcher.fetch(id, strategy).await;
        log::debug!("{} strategy finished in {:?}", strategy, started.elapsed());
        runs.push((strategy, outcome, started.elapsed()));
    }

    let comparison = Comparison::from_runs(id, &runs);
    writeln!(out, "{}", formatter.format_comparison(&comparison)?)?;
    Ok(comparison.agree)
}

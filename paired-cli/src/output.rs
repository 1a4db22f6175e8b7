// ABOUTME: This module handles output formatting for the paired CLI
// ABOUTME: It provides text formatting with color support, JSON output, and comparison tables

use anyhow::Result;
use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Format;
use crate::types::{Comparison, FetchReport, ReportResult};

pub trait OutputFormat {
    fn format_report(&self, report: &FetchReport) -> Result<String>;
    fn format_comparison(&self, comparison: &Comparison) -> Result<String>;
}

pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn format_success(&self, report: &FetchReport) -> String {
        let ReportResult::Ok { metadata, image } = &report.result else {
            return String::new();
        };

        let title = metadata.to_string();
        let details = format!(
            "{} image, {}x{} (id {}, {} strategy)",
            image.format, image.width, image.height, report.id, report.strategy
        );

        if self.use_color {
            format!("{}\n{}", title.bold(), details.dimmed())
        } else {
            format!("{}\n{}", title, details)
        }
    }

    fn format_error(&self, report: &FetchReport) -> String {
        let ReportResult::Error { message, help, .. } = &report.result else {
            return String::new();
        };

        let mut lines = Vec::new();
        if self.use_color {
            lines.push(format!("{} {}", "error:".red().bold(), message));
        } else {
            lines.push(format!("error: {}", message));
        }
        if let Some(help) = help {
            if self.use_color {
                lines.push(format!("{} {}", "help:".cyan(), help));
            } else {
                lines.push(format!("help: {}", help));
            }
        }
        lines.join("\n")
    }

    fn format_verdict(&self, agree: bool) -> String {
        let verdict = if agree {
            "All strategies agree"
        } else {
            "Strategies disagree"
        };

        match (self.use_color, agree) {
            (true, true) => verdict.green().to_string(),
            (true, false) => verdict.red().bold().to_string(),
            (false, _) => verdict.to_string(),
        }
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormat for JsonFormatter {
    fn format_report(&self, report: &FetchReport) -> Result<String> {
        self.render(report)
    }

    fn format_comparison(&self, comparison: &Comparison) -> Result<String> {
        self.render(comparison)
    }
}

/// Pick the formatter for a resolved format. `pretty` applies to any JSON
/// output, whether `--json` or the config file chose it.
pub fn formatter_for(format: Format, pretty: bool, use_color: bool) -> Box<dyn OutputFormat> {
    match format {
        Format::Json => Box::new(JsonFormatter::new(pretty)),
        Format::Text => Box::new(TextFormatter::new(use_color)),
    }
}

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Time")]
    elapsed: String,
}

impl OutputFormat for TextFormatter {
    fn format_report(&self, report: &FetchReport) -> Result<String> {
        Ok(if report.is_success() {
            self.format_success(report)
        } else {
            self.format_error(report)
        })
    }

    fn format_comparison(&self, comparison: &Comparison) -> Result<String> {
        let rows: Vec<TableRow> = comparison
            .rows
            .iter()
            .map(|row| TableRow {
                strategy: row.strategy.clone(),
                outcome: row.outcome.clone(),
                elapsed: format!("{} ms", row.elapsed_ms),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::psql());
        Ok(format!(
            "{}\n\n{}",
            table,
            self.format_verdict(comparison.agree)
        ))
    }
}

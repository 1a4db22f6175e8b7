// ABOUTME: Display-side types built from fetch outcomes for the paired CLI
// ABOUTME: Provides serializable reports for single fetches and strategy comparisons

use paired_sdk::decode::format_name;
use paired_sdk::{FetchErrorKind, FetchOutcome, ImageMetadata, ResourceId, Strategy};
use serde::Serialize;
use std::time::Duration;

/// Summary of a decoded image, enough to show without the pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub width: u32,
    pub height: u32,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReportResult {
    Ok {
        metadata: ImageMetadata,
        image: ImageSummary,
    },
    Error {
        kind: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        help: Option<String>,
    },
}

/// What a single paired fetch produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    pub id: ResourceId,
    pub strategy: String,
    #[serde(flatten)]
    pub result: ReportResult,
}

impl FetchReport {
    pub fn from_outcome(id: ResourceId, strategy: Strategy, outcome: &FetchOutcome) -> Self {
        let result = match outcome {
            Ok(resource) => ReportResult::Ok {
                metadata: resource.metadata().clone(),
                image: ImageSummary {
                    width: resource.image().width(),
                    height: resource.image().height(),
                    format: format_name(resource.image().format()).to_string(),
                },
            },
            Err(err) => ReportResult::Error {
                kind: kind_name(err.kind()).to_string(),
                message: err.to_string(),
                help: err.help_text().map(str::to_string),
            },
        };

        Self {
            id,
            strategy: strategy.name().to_string(),
            result,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.result, ReportResult::Ok { .. })
    }
}

pub fn kind_name(kind: FetchErrorKind) -> &'static str {
    match kind {
        FetchErrorKind::BadImage => "bad-image",
        FetchErrorKind::InvalidMetadata => "invalid-metadata",
    }
}

/// One strategy's line in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub strategy: String,
    pub outcome: String,
    pub elapsed_ms: u128,
}

/// Every strategy run against the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub id: ResourceId,
    pub rows: Vec<ComparisonRow>,
    pub agree: bool,
}

impl Comparison {
    pub fn from_runs(id: ResourceId, runs: &[(Strategy, FetchOutcome, Duration)]) -> Self {
        let rows = runs
            .iter()
            .map(|(strategy, outcome, elapsed)| ComparisonRow {
                strategy: strategy.name().to_string(),
                outcome: summarize(outcome),
                elapsed_ms: elapsed.as_millis(),
            })
            .collect();

        let agree = runs.windows(2).all(|pair| pair[0].1 == pair[1].1);

        Self { id, rows, agree }
    }
}

fn summarize(outcome: &FetchOutcome) -> String {
    match outcome {
        Ok(resource) => resource.metadata().to_string(),
        Err(err) => format!("{}: {}", kind_name(err.kind()), err.cause()),
    }
}

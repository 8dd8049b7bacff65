//! Line-oriented report output.
//!
//! Text lines look like
//! `Basic Auth: success | 103.27 ms | Access granted with Basic Authentication.`
//! JSON mode writes one object per line with the same information plus the
//! attempt count.

use std::io::{self, Write};

use serde::Serialize;

use crate::config::ReportFormat;
use crate::runner::{ScenarioReport, ScenarioSummary};

/// Status label used when the runner could not produce a result.
pub const RUNNER_ERROR_STATUS: &str = "error";

#[derive(Debug, Serialize)]
struct ReportLine<'a> {
    scenario: &'a str,
    status: &'static str,
    elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    attempts: usize,
}

impl<'a> ReportLine<'a> {
    fn from_report(report: &'a ScenarioReport) -> Self {
        match &report.outcome {
            Ok(result) => Self {
                scenario: &report.name,
                status: result.final_status().as_str(),
                elapsed_ms: round2(report.elapsed_ms),
                result: result.result_value(),
                error: result.error().map(ToString::to_string),
                attempts: result.attempts().len(),
            },
            Err(err) => Self {
                scenario: &report.name,
                status: RUNNER_ERROR_STATUS,
                elapsed_ms: round2(report.elapsed_ms),
                result: None,
                error: Some(err.to_string()),
                attempts: 0,
            },
        }
    }

    /// Result value when there is one, otherwise the error message.
    fn detail(&self) -> &str {
        match (self.result, &self.error) {
            (Some(value), _) => value,
            (None, Some(error)) => error,
            (None, None) => "",
        }
    }
}

fn round2(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

/// Render one report as a text line (without newline).
pub fn format_line(report: &ScenarioReport) -> String {
    let line = ReportLine::from_report(report);
    format!(
        "{}: {} | {:.2} ms | {}",
        line.scenario,
        line.status,
        report.elapsed_ms,
        line.detail()
    )
}

/// Render one repeated-run summary as a text line (without newline).
pub fn format_summary(summary: &ScenarioSummary) -> String {
    format!(
        "{}: runs={} success={} fallback={} failed={} error={} | mean {:.2} ms | min {:.2} ms | max {:.2} ms",
        summary.name,
        summary.runs,
        summary.successes,
        summary.fallbacks,
        summary.failures,
        summary.errors,
        summary.mean_ms,
        summary.min_ms,
        summary.max_ms
    )
}

/// Write one line per scenario.
pub fn write_reports<W: Write>(out: &mut W, reports: &[ScenarioReport], format: ReportFormat) -> io::Result<()> {
    for report in reports {
        match format {
            ReportFormat::Text => writeln!(out, "{}", format_line(report))?,
            ReportFormat::Json => {
                serde_json::to_writer(&mut *out, &ReportLine::from_report(report))?;
                writeln!(out)?;
            }
        }
    }
    out.flush()
}

/// Write one summary line per scenario.
pub fn write_summaries<W: Write>(
    out: &mut W,
    summaries: &[ScenarioSummary],
    format: ReportFormat,
) -> io::Result<()> {
    for summary in summaries {
        match format {
            ReportFormat::Text => writeln!(out, "{}", format_summary(summary))?,
            ReportFormat::Json => {
                serde_json::to_writer(&mut *out, summary)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()
}

// SPDX-License-Identifier: Apache-2.0

//! Rendering and exit-code mapping for scan and coverage reports. Progress
//! and failure text are built as separate blocks so the CLI can keep the
//! upstream stream discipline: per-file status lines on stdout, failure
//! summaries on stderr.

use cten_check_model::{CoverageReport, FileStatus, ScanReport};

use crate::ScanError;

fn status_word(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Pass => "pass",
        FileStatus::Fail => "fail",
        FileStatus::Malformed => "malformed",
    }
}

fn progress_lines(report: &ScanReport) -> Vec<String> {
    report
        .outcomes
        .iter()
        .map(|outcome| {
            let platform = outcome
                .platform
                .as_ref()
                .map(|name| format!(" [{name}]"))
                .unwrap_or_default();
            if outcome.failures.is_empty() {
                format!("{}{platform}: pass", outcome.file)
            } else {
                format!(
                    "{}{platform}: {} ({} failure{})",
                    outcome.file,
                    status_word(outcome.status),
                    outcome.failures.len(),
                    if outcome.failures.len() == 1 { "" } else { "s" }
                )
            }
        })
        .collect()
}

fn failure_lines(report: &ScanReport) -> Vec<String> {
    let mut lines = vec!["--- Test Failures Summary ---".to_string()];
    for failure in &report.failures {
        lines.push(format!(
            "  File: {}, Operator: {}, Test: {}, Details: {}",
            failure.file, failure.operator, failure.test_point, failure.details
        ));
    }
    lines
}

fn summary_line(report: &ScanReport) -> String {
    format!(
        "summary: files={} passed={} failed={} malformed={} failures={}",
        report.summary.files,
        report.summary.passed,
        report.summary.failed,
        report.summary.malformed,
        report.summary.failures
    )
}

fn verdict_line(report: &ScanReport) -> String {
    if report.all_passed() {
        "All tests passed across all reports.".to_string()
    } else {
        "One or more tests failed or reports were invalid.".to_string()
    }
}

/// Per-file status lines; on an all-pass run the summary and verdict land
/// here too, so a clean invocation writes nothing to stderr.
pub fn render_scan_progress(report: &ScanReport) -> String {
    let mut lines = progress_lines(report);
    if report.all_passed() {
        lines.push(summary_line(report));
        lines.push(verdict_line(report));
    }
    lines.join("\n")
}

/// Failure summary and verdict; empty when every file passed.
pub fn render_scan_failure_summary(report: &ScanReport) -> String {
    if report.all_passed() {
        return String::new();
    }
    let mut lines = failure_lines(report);
    lines.push(summary_line(report));
    lines.push(verdict_line(report));
    lines.join("\n")
}

/// Combined text rendering, used for `--out` artifacts.
pub fn render_scan_text(report: &ScanReport) -> String {
    let mut lines = progress_lines(report);
    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.append(&mut failure_lines(report));
    }
    lines.push(summary_line(report));
    lines.push(verdict_line(report));
    lines.join("\n")
}

pub fn render_scan_json(report: &ScanReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|err| err.to_string())
}

pub fn render_scan_jsonl(report: &ScanReport) -> Result<String, String> {
    let mut lines = Vec::new();
    for outcome in &report.outcomes {
        lines.push(serde_json::to_string(outcome).map_err(|err| err.to_string())?);
    }
    Ok(lines.join("\n"))
}

fn coverage_info_lines(report: &CoverageReport) -> Vec<String> {
    vec![
        format!("operator source file: {}", report.operator_file),
        format!("test directory: {}", report.test_dir),
        format!(
            "found {} operators: [{}]",
            report.operators.len(),
            report.operators.join(", ")
        ),
        format!(
            "found {} test files: [{}]",
            report.tested.len(),
            report.tested.join(", ")
        ),
    ]
}

fn coverage_gap_lines(report: &CoverageReport) -> Vec<String> {
    let mut lines = vec![format!(
        "The following operators are missing test files in {}:",
        report.test_dir
    )];
    for name in &report.missing {
        lines.push(format!(
            "  - Operator: Tensor_{name} (expected test file: test_{name}.c)"
        ));
    }
    lines
}

/// Input paths and extraction counts; carries the success line when
/// coverage is full.
pub fn render_coverage_progress(report: &CoverageReport) -> String {
    let mut lines = coverage_info_lines(report);
    if report.full_coverage() {
        lines.push("All defined operators have corresponding test files.".to_string());
    }
    lines.join("\n")
}

/// Missing-test listing; empty when coverage is full.
pub fn render_coverage_failure_summary(report: &CoverageReport) -> String {
    if report.full_coverage() {
        return String::new();
    }
    coverage_gap_lines(report).join("\n")
}

/// Combined text rendering, used for `--out` artifacts.
pub fn render_coverage_text(report: &CoverageReport) -> String {
    let mut lines = coverage_info_lines(report);
    if report.full_coverage() {
        lines.push("All defined operators have corresponding test files.".to_string());
    } else {
        lines.append(&mut coverage_gap_lines(report));
    }
    lines.join("\n")
}

pub fn render_coverage_json(report: &CoverageReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|err| err.to_string())
}

pub fn exit_code_for_scan(report: &ScanReport) -> i32 {
    if report.all_passed() {
        0
    } else {
        1
    }
}

pub fn exit_code_for_coverage(report: &CoverageReport) -> i32 {
    if report.full_coverage() {
        0
    } else {
        1
    }
}

/// Usage-level errors get a distinct exit code so the pipeline can tell a
/// misconfigured invocation apart from a failing test run.
pub fn exit_code_for_scan_error(err: &ScanError) -> i32 {
    match err {
        ScanError::NotADirectory(_) => 2,
        ScanError::NoResultFiles(_) | ScanError::Input(_) => 1,
    }
}

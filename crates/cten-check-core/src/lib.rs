// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Core logic for the cTensor CI checkers. Everything here operates over the
//! `Fs` port so report parsing, log scanning, and coverage extraction stay
//! testable without touching the real filesystem.

use std::fmt;
use std::path::PathBuf;

pub mod coverage;
pub mod csv_reports;
pub mod render;
pub mod result_logs;

pub use coverage::{check_coverage, extract_operators, test_names_in_dir};
pub use csv_reports::{parse_report, scan_reports};
pub use render::{
    exit_code_for_coverage, exit_code_for_scan, exit_code_for_scan_error,
    render_coverage_failure_summary, render_coverage_json, render_coverage_progress,
    render_coverage_text, render_scan_failure_summary, render_scan_json, render_scan_jsonl,
    render_scan_progress, render_scan_text,
};
pub use result_logs::{discover_result_logs, scan_result_logs, ResultLog};

pub use cten_check_model::{CoverageReport, ScanReport};

/// Fatal input error: the invocation itself is misconfigured, as opposed to
/// a per-file failure which is recorded in the report and never aborts the
/// batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    NotADirectory(PathBuf),
    NoResultFiles(PathBuf),
    Input(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirectory(path) => write!(f, "not a directory: {}", path.display()),
            Self::NoResultFiles(path) => write!(
                f,
                "no result files matching {}/*/results-*.txt",
                path.display()
            ),
            Self::Input(detail) => f.write_str(detail),
        }
    }
}

impl std::error::Error for ScanError {}

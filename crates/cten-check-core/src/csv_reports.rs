// SPDX-License-Identifier: Apache-2.0

//! CSV report aggregation. A report is a header-delimited table whose base
//! columns identify the operator and test point; every other column is one
//! sub-test whose cell is `/` or empty on pass and a free-text detail on
//! failure.

use std::path::{Path, PathBuf};

use cten_check_adapters::Fs;
use cten_check_model::{
    FailureKind, FailureRecord, FileOutcome, FileStatus, ScanReport, NOT_APPLICABLE,
};

pub const BASE_HEADERS: [&str; 2] = ["Operator", "TestPoint"];
pub const PASS_CELL: &str = "/";

/// Scans each report path in argument order. Missing or malformed files are
/// recorded as failures for that file and never abort the batch.
pub fn scan_reports(fs: &dyn Fs, root: &Path, paths: &[PathBuf]) -> ScanReport {
    let inputs = paths.iter().map(|p| p.display().to_string()).collect();
    let outcomes = paths
        .iter()
        .map(|path| scan_report_file(fs, root, path))
        .collect();
    ScanReport::new("reports", inputs, outcomes)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn scan_report_file(fs: &dyn Fs, root: &Path, path: &Path) -> FileOutcome {
    let file = file_label(path);
    if !fs.exists(root, path) {
        return FileOutcome::malformed(
            &file,
            FailureKind::FileNotFound,
            format!("report file {} was not found", path.display()),
        );
    }
    match fs.read_text(root, path) {
        Ok(text) => parse_report(&file, &text),
        Err(err) => FileOutcome::malformed(
            &file,
            FailureKind::ParsingError,
            format!("could not read {}: {err}", path.display()),
        ),
    }
}

/// Parses one report's text. Pure: the caller owns all filesystem access.
pub fn parse_report(file: &str, text: &str) -> FileOutcome {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            return FileOutcome::malformed(
                file,
                FailureKind::ParsingError,
                format!("could not parse {file}: {err}"),
            );
        }
    };

    let operator_idx = headers.iter().position(|h| h == BASE_HEADERS[0]);
    let test_point_idx = headers.iter().position(|h| h == BASE_HEADERS[1]);
    let (Some(operator_idx), Some(test_point_idx)) = (operator_idx, test_point_idx) else {
        return FileOutcome::malformed(
            file,
            FailureKind::InvalidBaseHeaders,
            format!(
                "report file {file} has invalid or missing base CSV headers ({})",
                BASE_HEADERS.join(", ")
            ),
        );
    };

    let sub_tests: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !BASE_HEADERS.contains(header))
        .map(|(idx, header)| (idx, header.to_string()))
        .collect();

    let mut failures = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                // A broken record taints the whole file; earlier row
                // failures stay in the report.
                failures.push(FailureRecord::for_file(
                    file,
                    FailureKind::ParsingError,
                    format!("could not parse {file}: {err}"),
                ));
                return FileOutcome {
                    file: file.to_string(),
                    platform: None,
                    status: FileStatus::Malformed,
                    failures,
                };
            }
        };

        let operator = record.get(operator_idx).unwrap_or(NOT_APPLICABLE);
        let test_point = record.get(test_point_idx).unwrap_or(NOT_APPLICABLE);
        let details: Vec<String> = sub_tests
            .iter()
            .filter_map(|(idx, header)| {
                let cell = record.get(*idx).unwrap_or("");
                if cell == PASS_CELL || cell.is_empty() {
                    None
                } else {
                    Some(format!("Sub-test '{header}': {cell}"))
                }
            })
            .collect();

        if !details.is_empty() {
            failures.push(FailureRecord::for_row(
                file,
                operator,
                test_point,
                FailureKind::SubTestFailed,
                details.join("; "),
            ));
        }
    }

    if failures.is_empty() {
        FileOutcome::passed(file, None)
    } else {
        FileOutcome::failed(file, None, failures)
    }
}

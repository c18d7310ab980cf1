// SPDX-License-Identifier: Apache-2.0

//! Plain-text result-log aggregation. Logs live two levels under the results
//! directory (`<dir>/<platform>/results-*.txt`); a log passes when every
//! required marker substring is present and no line contains `FAIL`.

use std::path::{Path, PathBuf};

use cten_check_adapters::Fs;
use cten_check_model::{FailureKind, FailureRecord, FileOutcome, FileStatus, ScanReport};

use crate::ScanError;

/// Markers emitted by the operator test binaries on success. The CLI can
/// replace this set for suites that use a different naming scheme.
pub const DEFAULT_REQUIRED_MARKERS: [&str; 2] = [
    "Test on Tensor_add Operator: PASS",
    "Test on Tensor_matmul Operator: PASS",
];

pub const FAIL_MARKER: &str = "FAIL";
const RESULT_FILE_PREFIX: &str = "results-";
const RESULT_FILE_SUFFIX: &str = ".txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLog {
    pub platform: String,
    pub path: PathBuf,
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Walks `<dir>/*/results-*.txt` in lexicographic order. The platform name
/// is the immediate parent directory of each log.
pub fn discover_result_logs(
    fs: &dyn Fs,
    root: &Path,
    dir: &Path,
) -> Result<Vec<ResultLog>, ScanError> {
    if !fs.is_dir(root, dir) {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }
    let mut logs = Vec::new();
    let subdirs = fs
        .list_dir(root, dir)
        .map_err(|err| ScanError::Input(err.to_string()))?;
    for subdir in subdirs {
        if !fs.is_dir(root, &subdir) {
            continue;
        }
        let platform = name_of(&subdir);
        let entries = fs
            .list_dir(root, &subdir)
            .map_err(|err| ScanError::Input(err.to_string()))?;
        for entry in entries {
            let name = name_of(&entry);
            if name.starts_with(RESULT_FILE_PREFIX)
                && name.ends_with(RESULT_FILE_SUFFIX)
                && !fs.is_dir(root, &entry)
            {
                logs.push(ResultLog {
                    platform: platform.clone(),
                    path: entry,
                });
            }
        }
    }
    logs.sort_by(|a, b| a.path.cmp(&b.path));
    if logs.is_empty() {
        return Err(ScanError::NoResultFiles(dir.to_path_buf()));
    }
    Ok(logs)
}

/// Scans every discovered log. Unreadable logs are recorded as failed, not
/// fatal; only a missing results directory or an empty glob aborts.
pub fn scan_result_logs(
    fs: &dyn Fs,
    root: &Path,
    dir: &Path,
    markers: &[String],
) -> Result<ScanReport, ScanError> {
    let logs = discover_result_logs(fs, root, dir)?;
    let mut outcomes = Vec::new();
    for log in &logs {
        let file = format!("{}/{}", log.platform, name_of(&log.path));
        match fs.read_text(root, &log.path) {
            Ok(text) => outcomes.push(check_log_text(&file, &log.platform, &text, markers)),
            Err(err) => {
                let mut outcome = FileOutcome::malformed(
                    &file,
                    FailureKind::Unreadable,
                    format!("could not read {}: {err}", log.path.display()),
                );
                outcome.platform = Some(log.platform.clone());
                outcomes.push(outcome);
            }
        }
    }
    let inputs = vec![dir.display().to_string()];
    Ok(ScanReport::new("results", inputs, outcomes))
}

/// Verdict for one log's text. Pure: injectable content, no filesystem.
pub fn check_log_text(file: &str, platform: &str, text: &str, markers: &[String]) -> FileOutcome {
    let mut failures = Vec::new();
    for marker in markers {
        if !text.contains(marker.as_str()) {
            failures.push(FailureRecord::for_file(
                file,
                FailureKind::MissingMarker,
                format!("expected marker not found: \"{marker}\""),
            ));
        }
    }
    for (idx, line) in text.lines().enumerate() {
        if line.contains(FAIL_MARKER) {
            failures.push(FailureRecord::for_file(
                file,
                FailureKind::FailMarker,
                format!("line {}: {}", idx + 1, line.trim()),
            ));
        }
    }
    let status = if failures.is_empty() {
        FileStatus::Pass
    } else {
        FileStatus::Fail
    };
    FileOutcome {
        file: file.to_string(),
        platform: Some(platform.to_string()),
        status,
        failures,
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Operator test-coverage checking: every `Tensor_<name>` function declared
//! in the operator source must have a matching `test_<name>.c` file.

use std::collections::BTreeSet;
use std::path::Path;

use cten_check_adapters::Fs;
use cten_check_model::CoverageReport;
use regex::Regex;

use crate::ScanError;

pub const DEFAULT_OPERATOR_FILE: &str = "src/operator.c";
pub const DEFAULT_TEST_DIR: &str = "tests/Operator";

const TEST_FILE_PREFIX: &str = "test_";
const TEST_FILE_SUFFIX: &str = ".c";

/// Names of every C function declared `[static] Tensor Tensor_<name>(`.
pub fn extract_operators(source: &str) -> Result<BTreeSet<String>, ScanError> {
    let pattern = Regex::new(r"(?:Tensor|static\s+Tensor)\s+Tensor_([A-Za-z0-9_]+)\s*\(")
        .map_err(|err| ScanError::Input(err.to_string()))?;
    Ok(pattern
        .captures_iter(source)
        .map(|caps| caps[1].to_string())
        .collect())
}

/// `<name>` of every `test_<name>.c` file in the test directory.
pub fn test_names_in_dir(
    fs: &dyn Fs,
    root: &Path,
    dir: &Path,
) -> Result<BTreeSet<String>, ScanError> {
    if !fs.is_dir(root, dir) {
        return Err(ScanError::Input(format!(
            "test directory not found: {}",
            dir.display()
        )));
    }
    let entries = fs
        .list_dir(root, dir)
        .map_err(|err| ScanError::Input(err.to_string()))?;
    let mut names = BTreeSet::new();
    for entry in entries {
        let Some(file_name) = entry.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if let Some(stem) = file_name
            .strip_prefix(TEST_FILE_PREFIX)
            .and_then(|rest| rest.strip_suffix(TEST_FILE_SUFFIX))
        {
            names.insert(stem.to_string());
        }
    }
    Ok(names)
}

/// Cross-references declared operators against existing test files. A
/// missing operator file, a missing test directory, and an extraction that
/// finds zero operators are all fatal input errors; a coverage gap is a
/// reported result.
pub fn check_coverage(
    fs: &dyn Fs,
    root: &Path,
    operator_file: &Path,
    test_dir: &Path,
) -> Result<CoverageReport, ScanError> {
    if !fs.exists(root, operator_file) {
        return Err(ScanError::Input(format!(
            "operator file not found: {}",
            operator_file.display()
        )));
    }
    let source = fs
        .read_text(root, operator_file)
        .map_err(|err| ScanError::Input(err.to_string()))?;
    let operators = extract_operators(&source)?;
    if operators.is_empty() {
        // Zero matches means the extraction pattern itself is suspect.
        return Err(ScanError::Input(format!(
            "no operators found in {}",
            operator_file.display()
        )));
    }
    let tested = test_names_in_dir(fs, root, test_dir)?;
    let missing: Vec<String> = operators.difference(&tested).cloned().collect();
    Ok(CoverageReport {
        operator_file: operator_file.display().to_string(),
        test_dir: test_dir.display().to_string(),
        operators: operators.into_iter().collect(),
        tested: tested.into_iter().collect(),
        missing,
    })
}

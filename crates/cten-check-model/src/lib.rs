#![forbid(unsafe_code)]

//! Data model for the cTensor CI checkers: failure records, per-file
//! outcomes, and aggregated scan/coverage reports.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Placeholder used when a failure is not attributable to a specific
/// operator or test point, matching the upstream report convention.
pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    FileNotFound,
    InvalidBaseHeaders,
    ParsingError,
    SubTestFailed,
    Unreadable,
    MissingMarker,
    FailMarker,
    MissingTest,
}

impl FailureKind {
    /// Upper-case tag carried in the `test_point` slot of malformed-input
    /// failures, so consumers of the text summary can grep for it.
    pub fn label(self) -> &'static str {
        match self {
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::InvalidBaseHeaders => "INVALID_BASE_HEADERS",
            Self::ParsingError => "PARSING_ERROR",
            Self::SubTestFailed => "SUB_TEST_FAILED",
            Self::Unreadable => "UNREADABLE",
            Self::MissingMarker => "MISSING_MARKER",
            Self::FailMarker => "FAIL_MARKER",
            Self::MissingTest => "MISSING_TEST",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub file: String,
    pub operator: String,
    pub test_point: String,
    pub kind: FailureKind,
    pub details: String,
}

impl FailureRecord {
    /// A failure tied to a specific operator/test-point row.
    pub fn for_row(
        file: &str,
        operator: &str,
        test_point: &str,
        kind: FailureKind,
        details: String,
    ) -> Self {
        Self {
            file: file.to_string(),
            operator: operator.to_string(),
            test_point: test_point.to_string(),
            kind,
            details,
        }
    }

    /// A failure describing the input file itself rather than a row in it.
    pub fn for_file(file: &str, kind: FailureKind, details: String) -> Self {
        Self {
            file: file.to_string(),
            operator: NOT_APPLICABLE.to_string(),
            test_point: kind.label().to_string(),
            kind,
            details,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pass,
    Fail,
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub file: String,
    pub platform: Option<String>,
    pub status: FileStatus,
    pub failures: Vec<FailureRecord>,
}

impl FileOutcome {
    pub fn passed(file: &str, platform: Option<String>) -> Self {
        Self {
            file: file.to_string(),
            platform,
            status: FileStatus::Pass,
            failures: Vec::new(),
        }
    }

    pub fn failed(file: &str, platform: Option<String>, failures: Vec<FailureRecord>) -> Self {
        Self {
            file: file.to_string(),
            platform,
            status: FileStatus::Fail,
            failures,
        }
    }

    pub fn malformed(file: &str, kind: FailureKind, details: String) -> Self {
        Self {
            file: file.to_string(),
            platform: None,
            status: FileStatus::Malformed,
            failures: vec![FailureRecord::for_file(file, kind, details)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub files: u64,
    pub passed: u64,
    pub failed: u64,
    pub malformed: u64,
    pub failures: u64,
}

/// Result of one aggregator invocation over a batch of report files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub command: String,
    pub inputs: Vec<String>,
    pub outcomes: Vec<FileOutcome>,
    pub failures: Vec<FailureRecord>,
    pub summary: ScanSummary,
}

impl ScanReport {
    /// Assembles a report from per-file outcomes, flattening failures in
    /// discovery order and tallying the summary counts.
    pub fn new(command: &str, inputs: Vec<String>, outcomes: Vec<FileOutcome>) -> Self {
        let failures: Vec<FailureRecord> = outcomes
            .iter()
            .flat_map(|outcome| outcome.failures.iter().cloned())
            .collect();
        let summary = ScanSummary {
            files: outcomes.len() as u64,
            passed: outcomes
                .iter()
                .filter(|row| row.status == FileStatus::Pass)
                .count() as u64,
            failed: outcomes
                .iter()
                .filter(|row| row.status == FileStatus::Fail)
                .count() as u64,
            malformed: outcomes
                .iter()
                .filter(|row| row.status == FileStatus::Malformed)
                .count() as u64,
            failures: failures.len() as u64,
        };
        Self {
            command: command.to_string(),
            inputs,
            outcomes,
            failures,
            summary,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0 && self.summary.malformed == 0
    }
}

/// Result of cross-referencing declared operators against test files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub operator_file: String,
    pub test_dir: String,
    pub operators: Vec<String>,
    pub tested: Vec<String>,
    pub missing: Vec<String>,
}

impl CoverageReport {
    pub fn full_coverage(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn report_json_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "cten-check scan report",
        "type": "object",
        "required": ["command", "inputs", "outcomes", "failures", "summary"],
        "properties": {
            "command": {"type": "string"},
            "inputs": {"type": "array", "items": {"type": "string"}},
            "outcomes": {"type": "array"},
            "failures": {"type": "array"},
            "summary": {
                "type": "object",
                "required": ["files", "passed", "failed", "malformed", "failures"],
                "additionalProperties": {"type": "integer", "minimum": 0}
            }
        }
    })
}

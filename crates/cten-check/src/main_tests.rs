// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use crate::cli::{Cli, Command, FormatArg};
use crate::commands::{run_coverage, run_reports, run_results};

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, content).expect("write");
}

const PASSING_LOG: &str =
    "Test on Tensor_add Operator: PASS\nTest on Tensor_matmul Operator: PASS\n";

#[test]
fn reports_exit_zero_when_every_report_passes() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(tmp.path(), "good.csv", "Operator,TestPoint,Shape\nadd,basic,/\n");
    let (output, code) = run_reports(
        Some(tmp.path().to_path_buf()),
        vec![PathBuf::from("good.csv")],
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 0);
    assert!(output.stdout.contains("All tests passed across all reports."));
    assert!(output.stderr.is_empty());
}

#[test]
fn reports_exit_one_when_a_file_is_missing() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(tmp.path(), "good.csv", "Operator,TestPoint,Shape\nadd,basic,/\n");
    let (output, code) = run_reports(
        Some(tmp.path().to_path_buf()),
        vec![PathBuf::from("good.csv"), PathBuf::from("absent.csv")],
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 1);
    assert!(output.stderr.contains("FILE_NOT_FOUND"));
}

#[test]
fn reports_keep_per_file_progress_on_stdout_when_the_run_fails() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(tmp.path(), "good.csv", "Operator,TestPoint,Shape\nadd,basic,/\n");
    let (output, code) = run_reports(
        Some(tmp.path().to_path_buf()),
        vec![PathBuf::from("good.csv"), PathBuf::from("missing.csv")],
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 1);
    assert!(output.stdout.contains("good.csv: pass"));
    assert!(!output.stdout.contains("--- Test Failures Summary ---"));
    assert!(output.stderr.contains("--- Test Failures Summary ---"));
    assert!(output
        .stderr
        .contains("One or more tests failed or reports were invalid."));
}

#[test]
fn reports_json_output_is_machine_readable() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "report.csv",
        "Operator,TestPoint,Shape\nadd,basic,bad shape\n",
    );
    let (output, code) = run_reports(
        Some(tmp.path().to_path_buf()),
        vec![PathBuf::from("report.csv")],
        FormatArg::Json,
        None,
    )
    .expect("run");
    assert_eq!(code, 1);
    let payload: serde_json::Value = serde_json::from_str(&output.stdout).expect("json");
    assert_eq!(payload["summary"]["files"], 1);
    assert_eq!(payload["summary"]["failed"], 1);
    assert_eq!(payload["failures"][0]["operator"], "add");
}

#[test]
fn results_exit_codes_cover_pass_missing_dir_and_empty_glob() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(tmp.path(), "results/linux/results-ci.txt", PASSING_LOG);
    let (output, code) = run_results(
        Some(tmp.path().to_path_buf()),
        PathBuf::from("results"),
        Vec::new(),
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 0);
    assert!(output.stdout.contains("[linux]: pass"));

    let (output, code) = run_results(
        Some(tmp.path().to_path_buf()),
        PathBuf::from("nowhere"),
        Vec::new(),
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 2);
    assert!(output.stderr.contains("not a directory"));

    fs::create_dir_all(tmp.path().join("empty/linux")).expect("mkdir");
    let (output, code) = run_results(
        Some(tmp.path().to_path_buf()),
        PathBuf::from("empty"),
        Vec::new(),
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 1);
    assert!(output.stderr.contains("no result files"));
}

#[test]
fn results_fail_marker_trips_the_verdict() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "results/linux/results-ci.txt",
        "Test on Tensor_add Operator: PASS\nTest on Tensor_matmul Operator: PASS\nTest foo: FAIL\n",
    );
    let (output, code) = run_results(
        Some(tmp.path().to_path_buf()),
        PathBuf::from("results"),
        Vec::new(),
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 1);
    assert!(output.stderr.contains("line 3: Test foo: FAIL"));
}

#[test]
fn results_require_flags_replace_the_default_markers() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "results/linux/results-ci.txt",
        "Test test_tensor_add: PASS\nTest test_tensor_matmul: PASS\n",
    );
    let (_, code) = run_results(
        Some(tmp.path().to_path_buf()),
        PathBuf::from("results"),
        vec![
            "Test test_tensor_add: PASS".to_string(),
            "Test test_tensor_matmul: PASS".to_string(),
        ],
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 0);
}

#[test]
fn coverage_reports_gap_and_full_coverage() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "src/operator.c",
        "Tensor Tensor_add(Tensor a, Tensor b) {;}\nTensor Tensor_matmul(Tensor a, Tensor b) {;}\n",
    );
    write_file(tmp.path(), "tests/Operator/test_add.c", "");
    let (output, code) = run_coverage(
        Some(tmp.path().to_path_buf()),
        None,
        None,
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 1);
    assert!(output
        .stderr
        .contains("- Operator: Tensor_matmul (expected test file: test_matmul.c)"));

    write_file(tmp.path(), "tests/Operator/test_matmul.c", "");
    let (output, code) = run_coverage(
        Some(tmp.path().to_path_buf()),
        None,
        None,
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 0);
    assert!(output
        .stdout
        .contains("All defined operators have corresponding test files."));
    assert!(output.stderr.is_empty());
}

#[test]
fn coverage_explicit_paths_use_the_given_root_directly() {
    // No src/operator.c anywhere near the temp dir; with both paths given the
    // root must be taken as-is rather than discovered.
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "kernels/ops.c",
        "Tensor Tensor_add(Tensor a, Tensor b) {;}\n",
    );
    write_file(tmp.path(), "checks/test_add.c", "");
    let (output, code) = run_coverage(
        Some(tmp.path().to_path_buf()),
        Some(PathBuf::from("kernels/ops.c")),
        Some(PathBuf::from("checks")),
        FormatArg::Text,
        None,
    )
    .expect("run");
    assert_eq!(code, 0);
    assert!(output
        .stdout
        .contains("All defined operators have corresponding test files."));
}

#[test]
fn coverage_with_zero_operators_is_a_hard_error() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(tmp.path(), "src/operator.c", "int main(void) { return 0; }\n");
    write_file(tmp.path(), "tests/Operator/test_add.c", "");
    let err = run_coverage(
        Some(tmp.path().to_path_buf()),
        None,
        None,
        FormatArg::Text,
        None,
    )
    .expect_err("must fail");
    assert!(err.contains("no operators found"));
}

#[test]
fn out_flag_writes_the_rendered_report() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(tmp.path(), "good.csv", "Operator,TestPoint\nadd,basic\n");
    let out = tmp.path().join("verdict.txt");
    let (_, code) = run_reports(
        Some(tmp.path().to_path_buf()),
        vec![PathBuf::from("good.csv")],
        FormatArg::Text,
        Some(out.clone()),
    )
    .expect("run");
    assert_eq!(code, 0);
    let written = fs::read_to_string(out).expect("artifact");
    assert!(written.contains("summary: files=1 passed=1"));
}

#[test]
fn out_flag_keeps_the_combined_text_artifact_on_failure() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "report.csv",
        "Operator,TestPoint,Shape\nadd,basic,bad shape\n",
    );
    let out = tmp.path().join("verdict.txt");
    let (_, code) = run_reports(
        Some(tmp.path().to_path_buf()),
        vec![PathBuf::from("report.csv")],
        FormatArg::Text,
        Some(out.clone()),
    )
    .expect("run");
    assert_eq!(code, 1);
    let written = fs::read_to_string(out).expect("artifact");
    assert!(written.contains("report.csv: fail (1 failure)"));
    assert!(written.contains("--- Test Failures Summary ---"));
}

#[test]
fn cli_parses_repeatable_require_flags() {
    let cli = Cli::try_parse_from([
        "cten-check",
        "results",
        "artifacts",
        "--require",
        "A: PASS",
        "--require",
        "B: PASS",
    ])
    .expect("parse");
    match cli.command {
        Command::Results { dir, require, .. } => {
            assert_eq!(dir, PathBuf::from("artifacts"));
            assert_eq!(require, vec!["A: PASS".to_string(), "B: PASS".to_string()]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn cli_requires_at_least_one_report_file() {
    assert!(Cli::try_parse_from(["cten-check", "reports"]).is_err());
}

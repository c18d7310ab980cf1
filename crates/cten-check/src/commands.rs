// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cten_check_adapters::RealFs;
use cten_check_core::coverage::{DEFAULT_OPERATOR_FILE, DEFAULT_TEST_DIR};
use cten_check_core::result_logs::DEFAULT_REQUIRED_MARKERS;
use cten_check_core::{
    check_coverage, exit_code_for_coverage, exit_code_for_scan, exit_code_for_scan_error,
    render_coverage_failure_summary, render_coverage_json, render_coverage_progress,
    render_coverage_text, render_scan_failure_summary, render_scan_json, render_scan_jsonl,
    render_scan_progress, render_scan_text, scan_reports, scan_result_logs, ScanReport,
};

use crate::cli::{Cli, Command, FormatArg};

pub(crate) fn run_cli(cli: Cli) -> i32 {
    let exit = match cli.command {
        Command::Reports { files, format, out } => emit(
            cli.quiet,
            "reports",
            run_reports(cli.repo_root, files, format, out),
        ),
        Command::Results {
            dir,
            require,
            format,
            out,
        } => emit(
            cli.quiet,
            "results",
            run_results(cli.repo_root, dir, require, format, out),
        ),
        Command::Coverage {
            operator_file,
            test_dir,
            format,
            out,
        } => emit(
            cli.quiet,
            "coverage",
            run_coverage(cli.repo_root, operator_file, test_dir, format, out),
        ),
    };
    if cli.verbose {
        let _ = writeln!(io::stderr(), "cten-check exit={exit}");
    }
    exit
}

/// Rendered output split by destination stream: progress and per-file status
/// lines belong on stdout, failure summaries on stderr.
#[derive(Debug)]
pub(crate) struct CommandOutput {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

fn emit(quiet: bool, name: &str, result: Result<(CommandOutput, i32), String>) -> i32 {
    match result {
        Ok((output, code)) => {
            if !quiet {
                if !output.stdout.is_empty() {
                    let _ = writeln!(io::stdout(), "{}", output.stdout);
                }
                if !output.stderr.is_empty() {
                    let _ = writeln!(io::stderr(), "{}", output.stderr);
                }
            }
            code
        }
        Err(err) => {
            let _ = writeln!(io::stderr(), "cten-check {name} failed: {err}");
            1
        }
    }
}

fn invocation_root(arg: Option<PathBuf>) -> Result<PathBuf, String> {
    match arg {
        Some(root) => Ok(root),
        None => std::env::current_dir().map_err(|err| err.to_string()),
    }
}

fn discover_repo_root(start: &Path) -> Result<PathBuf, String> {
    let mut current = start.canonicalize().map_err(|err| err.to_string())?;
    loop {
        if current.join(DEFAULT_OPERATOR_FILE).exists() {
            return Ok(current);
        }
        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            return Err(format!(
                "could not discover repo root (no {DEFAULT_OPERATOR_FILE} found)"
            ));
        }
    }
}

fn write_output_if_requested(out: Option<PathBuf>, rendered: &str) -> Result<(), String> {
    if let Some(path) = out {
        std::fs::write(&path, format!("{rendered}\n"))
            .map_err(|err| format!("cannot write {}: {err}", path.display()))?;
    }
    Ok(())
}

/// Splits a scan report into stream-routed output plus the combined artifact
/// for `--out`. Structured formats are machine output and go to stdout whole.
fn scan_output(format: FormatArg, report: &ScanReport) -> Result<(CommandOutput, String), String> {
    Ok(match format {
        FormatArg::Text => (
            CommandOutput {
                stdout: render_scan_progress(report),
                stderr: render_scan_failure_summary(report),
            },
            render_scan_text(report),
        ),
        FormatArg::Json => {
            let doc = render_scan_json(report)?;
            (
                CommandOutput {
                    stdout: doc.clone(),
                    stderr: String::new(),
                },
                doc,
            )
        }
        FormatArg::Jsonl => {
            let doc = render_scan_jsonl(report)?;
            (
                CommandOutput {
                    stdout: doc.clone(),
                    stderr: String::new(),
                },
                doc,
            )
        }
    })
}

pub(crate) fn run_reports(
    repo_root: Option<PathBuf>,
    files: Vec<PathBuf>,
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(CommandOutput, i32), String> {
    let root = invocation_root(repo_root)?;
    let report = scan_reports(&RealFs, &root, &files);
    let (output, artifact) = scan_output(format, &report)?;
    write_output_if_requested(out, &artifact)?;
    Ok((output, exit_code_for_scan(&report)))
}

pub(crate) fn run_results(
    repo_root: Option<PathBuf>,
    dir: PathBuf,
    require: Vec<String>,
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(CommandOutput, i32), String> {
    let root = invocation_root(repo_root)?;
    let markers = if require.is_empty() {
        DEFAULT_REQUIRED_MARKERS
            .iter()
            .map(|marker| marker.to_string())
            .collect()
    } else {
        require
    };
    match scan_result_logs(&RealFs, &root, &dir, &markers) {
        Ok(report) => {
            let (output, artifact) = scan_output(format, &report)?;
            write_output_if_requested(out, &artifact)?;
            Ok((output, exit_code_for_scan(&report)))
        }
        Err(err) => Ok((
            CommandOutput {
                stdout: String::new(),
                stderr: err.to_string(),
            },
            exit_code_for_scan_error(&err),
        )),
    }
}

pub(crate) fn run_coverage(
    repo_root: Option<PathBuf>,
    operator_file: Option<PathBuf>,
    test_dir: Option<PathBuf>,
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(CommandOutput, i32), String> {
    // With both paths given explicitly the defaults are unused, so the
    // stated root is taken as-is instead of walking up for src/operator.c.
    let root = match (&repo_root, &operator_file, &test_dir) {
        (Some(root), Some(_), Some(_)) => root.clone(),
        (Some(root), _, _) => discover_repo_root(root)?,
        (None, Some(_), Some(_)) => invocation_root(None)?,
        (None, _, _) => {
            let cwd = std::env::current_dir().map_err(|err| err.to_string())?;
            discover_repo_root(&cwd)?
        }
    };
    let operator_file = operator_file.unwrap_or_else(|| PathBuf::from(DEFAULT_OPERATOR_FILE));
    let test_dir = test_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_TEST_DIR));
    let report =
        check_coverage(&RealFs, &root, &operator_file, &test_dir).map_err(|err| err.to_string())?;
    let (output, artifact) = match format {
        FormatArg::Text => (
            CommandOutput {
                stdout: render_coverage_progress(&report),
                stderr: render_coverage_failure_summary(&report),
            },
            render_coverage_text(&report),
        ),
        FormatArg::Json | FormatArg::Jsonl => {
            let doc = render_coverage_json(&report)?;
            (
                CommandOutput {
                    stdout: doc.clone(),
                    stderr: String::new(),
                },
                doc,
            )
        }
    };
    write_output_if_requested(out, &artifact)?;
    Ok((output, exit_code_for_coverage(&report)))
}

// SPDX-License-Identifier: Apache-2.0
//! `cli` defines argument parsing and the command surface. Parsing and
//! normalization live here; verdict logic belongs in `commands`/`core`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub(crate) fn run() -> i32 {
    let cli = Cli::parse();
    crate::commands::run_cli(cli)
}

#[derive(Parser, Debug)]
#[command(name = "cten-check", version, disable_help_subcommand = true)]
#[command(about = "CI verdicts for cTensor test artifacts")]
pub(crate) struct Cli {
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
    #[arg(long)]
    pub repo_root: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Aggregate CSV test reports into one pass/fail verdict.
    Reports {
        #[arg(required = true, value_name = "REPORT.csv")]
        files: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check per-platform text logs under <DIR>/<platform>/results-*.txt.
    Results {
        dir: PathBuf,
        /// Replace the default required PASS markers (repeatable).
        #[arg(long = "require", value_name = "SUBSTRING")]
        require: Vec<String>,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Cross-reference declared operators against existing test files.
    Coverage {
        #[arg(long, value_name = "FILE")]
        operator_file: Option<PathBuf>,
        #[arg(long, value_name = "DIR")]
        test_dir: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormatArg {
    Text,
    Json,
    Jsonl,
}

// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod cli;
mod commands;
#[cfg(test)]
mod main_tests;

fn main() {
    std::process::exit(cli::run());
}

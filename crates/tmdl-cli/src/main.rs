// Dweve TMDL - Tabular Model Definition Language Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! TMDL Command Line Interface

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tmdl_cli::cli::Commands;

/// TMDL - Tabular Model Definition Language toolkit
///
/// Structural, round-trip-safe editing of TMDL semantic-model files:
/// validation, inspection, and targeted column/measure edits that leave
/// every untouched byte alone.
///
/// # Examples
///
/// ```bash
/// # Verify a table file survives a byte-identical round trip
/// tmdl validate definition/tables/Fact.tmdl
///
/// # Add a measure, editing the file in place (atomic rename)
/// tmdl add Fact.tmdl --table Fact --kind measure \
///     --payload '{"name": "Total Revenue", "expression": "SUM(Fact[Revenue])"}' \
///     --in-place
///
/// # Round-trip check a whole model directory in parallel
/// tmdl check definition/tables/*.tmdl --parallel
/// ```
#[derive(Parser)]
#[command(name = "tmdl")]
#[command(author, version, about = "TMDL - Tabular Model Definition Language toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

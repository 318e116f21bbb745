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

//! CLI command definitions and argument parsing.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;
use tmdl::EntityKind;

use crate::commands;
use crate::error::CliResult;

/// Entity kinds addressable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChildKind {
    Column,
    Measure,
    Hierarchy,
    Partition,
}

impl From<ChildKind> for EntityKind {
    fn from(kind: ChildKind) -> Self {
        match kind {
            ChildKind::Column => EntityKind::Column,
            ChildKind::Measure => EntityKind::Measure,
            ChildKind::Hierarchy => EntityKind::Hierarchy,
            ChildKind::Partition => EntityKind::Partition,
        }
    }
}

/// Where an edited document goes.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Rewrite the input file in place (write-then-rename, atomic).
    #[arg(long, conflicts_with = "output")]
    pub in_place: bool,

    /// Write the result to this path instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Top-level CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a file and verify it round-trips byte for byte.
    Validate {
        /// TMDL file to validate.
        file: PathBuf,
    },

    /// Summarize the tables, columns, and measures in a file.
    Inspect {
        /// TMDL file to inspect.
        file: PathBuf,

        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a column or measure to a table.
    Add {
        /// TMDL file to edit.
        file: PathBuf,

        /// Table the new entity belongs to.
        #[arg(long)]
        table: String,

        /// Kind of entity to add.
        #[arg(long, value_enum)]
        kind: ChildKind,

        /// JSON payload: name, dataType, expression, formatString,
        /// summarizeBy, isHidden, description.
        #[arg(long)]
        payload: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Update properties of an existing entity.
    Update {
        /// TMDL file to edit.
        file: PathBuf,

        /// Table the entity belongs to.
        #[arg(long)]
        table: String,

        /// Name of the entity to update.
        #[arg(long)]
        name: String,

        /// Kind of the entity.
        #[arg(long, value_enum)]
        kind: ChildKind,

        /// JSON payload of property changes.
        #[arg(long)]
        payload: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete an entity from a table.
    Delete {
        /// TMDL file to edit.
        file: PathBuf,

        /// Table the entity belongs to.
        #[arg(long)]
        table: String,

        /// Name of the entity to delete.
        #[arg(long)]
        name: String,

        /// Kind of the entity.
        #[arg(long, value_enum)]
        kind: ChildKind,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Round-trip check many files, optionally in parallel.
    Check {
        /// TMDL files to check.
        files: Vec<PathBuf>,

        /// Check files in parallel.
        #[arg(long)]
        parallel: bool,
    },
}

impl Commands {
    /// Execute the command.
    pub fn execute(self) -> CliResult<()> {
        match self {
            Commands::Validate { file } => commands::validate(&file),
            Commands::Inspect { file, json } => commands::inspect(&file, json),
            Commands::Add {
                file,
                table,
                kind,
                payload,
                output,
            } => commands::add(&file, &table, kind.into(), &payload, &output),
            Commands::Update {
                file,
                table,
                name,
                kind,
                payload,
                output,
            } => commands::update(&file, &table, &name, kind.into(), &payload, &output),
            Commands::Delete {
                file,
                table,
                name,
                kind,
                output,
            } => commands::delete(&file, &table, &name, kind.into(), &output),
            Commands::Check { files, parallel } => commands::check(&files, parallel),
        }
    }
}

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

//! Command implementations.
//!
//! The core library is pure text-in/text-out; everything filesystem-shaped
//! lives here. In-place edits go through a temporary file in the target
//! directory followed by a rename, so an interrupted write never leaves a
//! half-written model file. Mutations run through checked serialization
//! before anything touches disk.

use colored::Colorize;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tmdl::{EntityKind, EntityPath, EntitySpec, PropertyChanges};

use crate::cli::OutputArgs;
use crate::error::{CliError, CliResult};

fn read_file(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|e| CliError::io("read", path, e))
}

/// Write through a sibling temporary file, then rename over the target.
fn write_atomic(path: &Path, content: &str) -> CliResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);
    fs::write(&tmp, content).map_err(|e| CliError::io("write", &tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| CliError::io("rename", &tmp, e))
}

fn deliver(path: &Path, content: &str, output: &OutputArgs) -> CliResult<()> {
    if output.in_place {
        write_atomic(path, content)?;
        println!("{} {}", "Updated".green(), path.display());
    } else if let Some(target) = &output.output {
        write_atomic(target, content)?;
        println!("{} {}", "Wrote".green(), target.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

/// Parse a file and verify a byte-identical round trip.
pub fn validate(path: &Path) -> CliResult<()> {
    let text = read_file(path)?;
    tmdl::validate(&text)?;
    println!("{} {}", "Valid".green(), path.display());
    Ok(())
}

/// Print a summary of the file's tables and their children.
pub fn inspect(path: &Path, as_json: bool) -> CliResult<()> {
    let text = read_file(path)?;
    let doc = tmdl::parse(&text)?;

    if as_json {
        let tables: Vec<serde_json::Value> = doc
            .tables()
            .map(|t| {
                serde_json::json!({
                    "name": t.name.value,
                    "lineageTag": t.lineage_tag(),
                    "isHidden": t.is_hidden(),
                    "columns": t.entities_of(EntityKind::Column)
                        .map(|c| c.name.value.as_str()).collect::<Vec<_>>(),
                    "measures": t.entities_of(EntityKind::Measure)
                        .map(|m| m.name.value.as_str()).collect::<Vec<_>>(),
                    "hierarchies": t.entities_of(EntityKind::Hierarchy)
                        .map(|h| h.name.value.as_str()).collect::<Vec<_>>(),
                    "partitions": t.entities_of(EntityKind::Partition)
                        .map(|p| p.name.value.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "tables": tables }))?);
        return Ok(());
    }

    for table in doc.tables() {
        println!("{} {}", "table".cyan().bold(), table.name.value);
        for measure in table.entities_of(EntityKind::Measure) {
            println!("  {} {}", "measure".yellow(), measure.name.value);
        }
        for column in table.entities_of(EntityKind::Column) {
            let marker = if column.is_calculated() { " (calculated)" } else { "" };
            println!("  {} {}{}", "column".blue(), column.name.value, marker);
        }
        for hierarchy in table.entities_of(EntityKind::Hierarchy) {
            println!("  {} {}", "hierarchy".magenta(), hierarchy.name.value);
        }
        for partition in table.entities_of(EntityKind::Partition) {
            println!("  {} {}", "partition".white(), partition.name.value);
        }
    }
    Ok(())
}

/// Add a column or measure from a JSON payload.
pub fn add(
    path: &Path,
    table: &str,
    kind: EntityKind,
    payload: &str,
    output: &OutputArgs,
) -> CliResult<()> {
    let text = read_file(path)?;
    let doc = tmdl::parse(&text)?;
    let json: serde_json::Value = serde_json::from_str(payload)?;
    let spec = EntitySpec::from_json(kind, &json)?;
    let doc = tmdl::add(&doc, &EntityPath::table(table), &spec)?;
    let out = tmdl::serialize_checked(&doc)?;
    deliver(path, &out, output)
}

/// Update an entity's properties from a JSON payload.
pub fn update(
    path: &Path,
    table: &str,
    name: &str,
    kind: EntityKind,
    payload: &str,
    output: &OutputArgs,
) -> CliResult<()> {
    let text = read_file(path)?;
    let doc = tmdl::parse(&text)?;
    let json: serde_json::Value = serde_json::from_str(payload)?;
    let changes = PropertyChanges::from_json(&json)?;
    let doc = tmdl::update(&doc, &EntityPath::child(table, name), kind, &changes)?;
    let out = tmdl::serialize_checked(&doc)?;
    deliver(path, &out, output)
}

/// Delete an entity.
pub fn delete(
    path: &Path,
    table: &str,
    name: &str,
    kind: EntityKind,
    output: &OutputArgs,
) -> CliResult<()> {
    let text = read_file(path)?;
    let doc = tmdl::parse(&text)?;
    let doc = tmdl::delete(&doc, &EntityPath::child(table, name), kind)?;
    let out = tmdl::serialize_checked(&doc)?;
    deliver(path, &out, output)
}

/// Round-trip check many files; different files are independent, so the
/// parallel path needs no coordination.
pub fn check(files: &[PathBuf], parallel: bool) -> CliResult<()> {
    let run = |path: &PathBuf| -> (PathBuf, Result<(), String>) {
        let outcome = read_file(path)
            .map_err(|e| e.to_string())
            .and_then(|text| tmdl::validate(&text).map_err(|e| e.to_string()));
        (path.clone(), outcome)
    };

    let results: Vec<(PathBuf, Result<(), String>)> = if parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };

    let mut failed = 0usize;
    for (path, outcome) in &results {
        match outcome {
            Ok(()) => println!("{} {}", "ok".green(), path.display()),
            Err(message) => {
                failed += 1;
                println!("{} {}: {}", "FAIL".red().bold(), path.display(), message);
            }
        }
    }
    if failed > 0 {
        return Err(CliError::CheckFailed {
            failed,
            total: files.len(),
        });
    }
    println!("{} {} files", "Checked".green(), files.len());
    Ok(())
}

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

//! End-to-end tests for the `tmdl` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FACT: &str = "table Fact\n\tlineageTag: t-1\n\n\tmeasure 'Total Revenue' = SUM(Fact[Revenue])\n\t\tformatString: #,0\n\t\tlineageTag: m-1\n\n\tcolumn Revenue\n\t\tdataType: double\n\t\tlineageTag: c-1\n\t\tsummarizeBy: sum\n\t\tsourceColumn: Revenue\n";

fn cmd() -> Command {
    Command::cargo_bin("tmdl").expect("binary builds")
}

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("fixture written");
    path
}

#[test]
fn validate_accepts_round_trippable_file() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Fact.tmdl", FACT);
    cmd()
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid"));
}

#[test]
fn validate_rejects_malformed_indentation() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Bad.tmdl", "table Fact\n\t\t\tdataType: string\n");
    cmd()
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("IndentationError"));
}

#[test]
fn inspect_lists_tables_and_children() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Fact.tmdl", FACT);
    cmd()
        .arg("inspect")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fact"))
        .stdout(predicate::str::contains("Total Revenue"))
        .stdout(predicate::str::contains("Revenue"));
}

#[test]
fn inspect_json_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Fact.tmdl", FACT);
    let output = cmd()
        .arg("inspect")
        .arg(&file)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["tables"][0]["name"], "Fact");
    assert_eq!(json["tables"][0]["measures"][0], "Total Revenue");
}

#[test]
fn add_measure_in_place_is_atomic_and_minimal() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Fact.tmdl", FACT);
    cmd()
        .arg("add")
        .arg(&file)
        .args(["--table", "Fact", "--kind", "measure"])
        .args([
            "--payload",
            r#"{"name": "Transaction Count", "expression": "COUNTROWS(Fact)"}"#,
        ])
        .arg("--in-place")
        .assert()
        .success();

    let text = fs::read_to_string(&file).unwrap();
    assert!(text.contains("measure 'Transaction Count' = COUNTROWS(Fact)"));
    // the original measure block is untouched
    assert!(text.contains("\tmeasure 'Total Revenue' = SUM(Fact[Revenue])\n\t\tformatString: #,0\n\t\tlineageTag: m-1\n"));
    // no stray temp file left behind
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn add_rejects_unknown_payload_key() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Fact.tmdl", FACT);
    cmd()
        .arg("add")
        .arg(&file)
        .args(["--table", "Fact", "--kind", "measure"])
        .args(["--payload", r#"{"name": "X", "expression": "1", "bogus": true}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnsupportedPropertyError"));
}

#[test]
fn add_duplicate_fails_and_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Fact.tmdl", FACT);
    cmd()
        .arg("add")
        .arg(&file)
        .args(["--table", "Fact", "--kind", "measure"])
        .args(["--payload", r#"{"name": "Total Revenue", "expression": "1"}"#])
        .arg("--in-place")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DuplicateNameError"));
    assert_eq!(fs::read_to_string(&file).unwrap(), FACT);
}

#[test]
fn update_format_string_writes_to_output_path() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Fact.tmdl", FACT);
    let out = dir.path().join("Fact.out.tmdl");
    cmd()
        .arg("update")
        .arg(&file)
        .args(["--table", "Fact", "--name", "Total Revenue", "--kind", "measure"])
        .args(["--payload", r#"{"formatString": "0.0%"}"#])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\t\tformatString: \"0.0%\"\n"));
    // source untouched
    assert_eq!(fs::read_to_string(&file).unwrap(), FACT);
}

#[test]
fn delete_measure_prints_result_to_stdout() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Fact.tmdl", FACT);
    cmd()
        .arg("delete")
        .arg(&file)
        .args(["--table", "Fact", "--name", "Total Revenue", "--kind", "measure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("column Revenue"))
        .stdout(predicate::str::contains("Total Revenue").not());
    // without --in-place the file is untouched
    assert_eq!(fs::read_to_string(&file).unwrap(), FACT);
}

#[test]
fn check_reports_each_file() {
    let dir = TempDir::new().unwrap();
    let good = write_fixture(&dir, "Good.tmdl", FACT);
    let bad = write_fixture(&dir, "Bad.tmdl", "nonsense line\n");
    cmd()
        .arg("check")
        .arg(&good)
        .arg(&bad)
        .arg("--parallel")
        .assert()
        .failure()
        .stdout(predicate::str::contains("ok"))
        .stdout(predicate::str::contains("FAIL"))
        .stderr(predicate::str::contains("1 of 2 files"));
}

#[test]
fn check_succeeds_on_clean_files() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(&dir, "A.tmdl", FACT);
    let b = write_fixture(&dir, "B.tmdl", "table Dim\n\tlineageTag: d-1\n");
    cmd()
        .arg("check")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked"));
}

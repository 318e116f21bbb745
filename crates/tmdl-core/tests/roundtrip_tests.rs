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

//! Round-trip integration tests for the parser, using the emitter as the
//! inverse, plus robustness properties over arbitrary input.

use proptest::prelude::*;
use tmdl_core::{parse, TmdlErrorKind};
use tmdl_emit::emit;

fn assert_round_trip(text: &str) {
    let doc = parse(text).unwrap_or_else(|e| panic!("parse failed: {}", e));
    assert_eq!(emit(&doc), text);
}

#[test]
fn empty_input_round_trips() {
    assert_round_trip("");
}

#[test]
fn table_with_comment_lines_round_trips() {
    assert_round_trip(
        "/// Fact table for revenue reporting\ntable Fact\n\t// legacy column retired 2024-03\n\tlineageTag: t-1\n",
    );
}

#[test]
fn stray_blank_whitespace_round_trips() {
    assert_round_trip("table Fact\n\tlineageTag: t-1\n   \n\tisHidden\n");
}

#[test]
fn relationship_file_round_trips() {
    assert_round_trip(
        "relationship 533f2b2b-8e1c-4f20-a686-ffa8a1b1c1d2\n\tfromColumn: Fact.Date\n\ttoColumn: DimDate.Date\n\tjoinOnDateBehavior: datePartOnly\n\nrelationship 8c6f0a9e-1111-2222-3333-444455556666\n\tisActive: false\n\tcrossFilteringBehavior: bothDirections\n\tfromColumn: Fact.Customer\n\ttoColumn: DimCustomer.Customer\n",
    );
}

#[test]
fn culture_file_with_opaque_metadata_round_trips() {
    assert_round_trip(
        "cultureInfo en-US\n\tcontentType: json\n\tlinguisticMetadata\n\t\t{\n\t\t\t\"Version\": \"1.0.0\",\n\t\t\t\"Language\": \"en-US\"\n\t\t}\n",
    );
}

#[test]
fn quoted_names_keep_their_authored_form() {
    assert_round_trip(
        "table 'Sales 2024'\n\tlineageTag: t-1\n\n\tmeasure 'Gross Margin %' = DIVIDE([Profit], [Revenue])\n\t\tformatString: 0.0%\n\t\tlineageTag: m-1\n",
    );
}

#[test]
fn unknown_top_level_keyword_is_rejected() {
    let err = parse("widget Gadget\n").unwrap_err();
    assert_eq!(err.kind, TmdlErrorKind::UnknownKeyword);
}

proptest! {
    // The parser must never panic, whatever bytes arrive.
    #[test]
    fn parser_never_panics(text in "[ -~\t\n]{0,300}") {
        let _ = parse(&text);
    }

    // Whatever parses must re-emit byte-identically.
    #[test]
    fn whatever_parses_round_trips(text in "[ -~\t\n]{0,300}") {
        if let Ok(doc) = parse(&text) {
            prop_assert_eq!(emit(&doc), text);
        }
    }
}

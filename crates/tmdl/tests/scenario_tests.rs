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

//! End-to-end scenarios over realistic model files.

use tmdl::{
    add, delete, parse, resolve, serialize, serialize_checked, update, validate, EntityKind,
    EntityPath, EntitySpec, PropertyChanges,
};

const FACT: &str = include_str!("fixtures/Fact.tmdl");
const DIM_DATE: &str = include_str!("fixtures/DimDate.tmdl");
const MODEL: &str = include_str!("fixtures/model.tmdl");
const METRIC_NAME: &str = include_str!("fixtures/MetricName.tmdl");

// ==================== round-trip idempotence ====================

#[test]
fn all_fixtures_round_trip_byte_identically() {
    for fixture in [FACT, DIM_DATE, MODEL, METRIC_NAME] {
        assert!(validate(fixture).is_ok());
    }
}

#[test]
fn fixtures_survive_checked_serialization() {
    for fixture in [FACT, DIM_DATE, MODEL, METRIC_NAME] {
        let doc = parse(fixture).unwrap();
        assert_eq!(serialize_checked(&doc).unwrap(), fixture);
    }
}

// ==================== hierarchy level deletion ====================

#[test]
fn deleting_one_level_keeps_everything_else_byte_identical() {
    let doc = parse(DIM_DATE).unwrap();
    let hierarchy = resolve(
        &doc,
        &EntityPath::child("DimDate", "Date Hierarchy"),
        Some(EntityKind::Hierarchy),
    )
    .unwrap();
    assert_eq!(hierarchy.entities_of(EntityKind::Level).count(), 4);

    let out = delete(
        &doc,
        &EntityPath::nested("DimDate", ["Date Hierarchy", "Quarter"]),
        EntityKind::Level,
    )
    .unwrap();

    let hierarchy = resolve(
        &out,
        &EntityPath::child("DimDate", "Date Hierarchy"),
        Some(EntityKind::Hierarchy),
    )
    .unwrap();
    assert_eq!(hierarchy.entities_of(EntityKind::Level).count(), 3);

    let removed = "\t\tlevel Quarter\n\t\t\tlineageTag: d1a2b3c4-0009-4a5b-8c7d-1234567890ab\n\t\t\tcolumn: Quarter\n\n";
    let expected = DIM_DATE.replacen(removed, "", 1);
    assert_eq!(serialize(&out), expected);
}

// ==================== measure insertion convention ====================

#[test]
fn measure_added_to_measureless_table_lands_before_first_column() {
    let doc = parse(DIM_DATE).unwrap();
    let spec = EntitySpec::measure("Total Revenue", "SUM(Fact[Revenue])");
    let out = add(&doc, &EntityPath::table("DimDate"), &spec).unwrap();
    let text = serialize(&out);

    let header_pos = text.find("table DimDate").unwrap();
    let measure_pos = text.find("measure 'Total Revenue'").unwrap();
    let first_column_pos = text.find("column Date").unwrap();
    assert!(header_pos < measure_pos && measure_pos < first_column_pos);

    // a fresh lineage tag was assigned
    let m = resolve(
        &out,
        &EntityPath::child("DimDate", "Total Revenue"),
        Some(EntityKind::Measure),
    )
    .unwrap();
    let tag = m.lineage_tag().unwrap();
    assert!(!DIM_DATE.contains(tag));

    // no column content changed: everything from the first column on is
    // exactly the original suffix
    let original_suffix = &DIM_DATE[DIM_DATE.find("\tcolumn Date").unwrap()..];
    assert!(text.ends_with(original_suffix));
}

// ==================== format string locality ====================

#[test]
fn adding_format_string_touches_exactly_one_line() {
    let doc = parse(DIM_DATE).unwrap();
    let changes = PropertyChanges::new().format_string("#,0");
    let out = update(
        &doc,
        &EntityPath::child("DimDate", "Year"),
        EntityKind::Column,
        &changes,
    )
    .unwrap();
    let text = serialize(&out);

    let original: Vec<&str> = DIM_DATE.lines().collect();
    let updated: Vec<&str> = text.lines().collect();
    assert_eq!(updated.len(), original.len() + 1);
    let added: Vec<&&str> = updated
        .iter()
        .filter(|l| !original.contains(*l))
        .collect();
    assert_eq!(added, vec![&"\t\tformatString: \"#,0\""]);
}

// ==================== calculation groups ====================

#[test]
fn calculation_group_items_are_addressable() {
    let doc = parse(METRIC_NAME).unwrap();
    let table = doc.table("MetricName").unwrap();
    let group = table
        .entities_of(EntityKind::CalculationGroup)
        .next()
        .unwrap();
    assert_eq!(group.property_value("precedence"), Some("1"));

    let ytd = group.child(EntityKind::CalculationItem, "YTD").unwrap();
    let body = ytd.expression.as_deref().unwrap();
    assert!(body.starts_with("CALCULATE("));
    assert!(body.contains("DATESYTD(DimDate[Date])"));
}

#[test]
fn updating_calculation_item_expression_preserves_siblings() {
    let doc = parse(METRIC_NAME).unwrap();
    let changes = PropertyChanges::new().expression("SELECTEDMEASURE() + 0");
    let out = update(
        &doc,
        &EntityPath::nested("MetricName", ["", "Current"]),
        EntityKind::CalculationItem,
        &changes,
    )
    .unwrap();
    let text = serialize(&out);
    assert!(text.contains("\t\tcalculationItem Current = SELECTEDMEASURE() + 0\n"));
    // the YTD item keeps its multi-line body verbatim
    assert!(text.contains("\t\tcalculationItem YTD =\n\t\t\t\tCALCULATE(\n"));
}

// ==================== model files ====================

#[test]
fn model_file_exposes_model_properties() {
    let doc = parse(MODEL).unwrap();
    let model = doc
        .entities()
        .find(|e| e.kind == EntityKind::Model)
        .unwrap();
    assert_eq!(model.property_value("culture"), Some("en-US"));
    assert_eq!(
        model.property_value("defaultPowerBIDataSourceVersion"),
        Some("powerBI_V3")
    );
}

#[test]
fn model_annotations_and_refs_survive_round_trip() {
    let doc = parse(MODEL).unwrap();
    let annotations: Vec<&str> = doc
        .entities()
        .filter(|e| e.kind == EntityKind::Annotation)
        .map(|a| a.name.value.as_str())
        .collect();
    assert_eq!(
        annotations,
        vec!["PBI_QueryOrder", "__PBI_TimeIntelligenceEnabled"]
    );
    assert_eq!(serialize(&doc), MODEL);
}

// ==================== variation targets stay by-name ====================

#[test]
fn variation_references_are_plain_name_strings() {
    let doc = parse(FACT).unwrap();
    let date = resolve(
        &doc,
        &EntityPath::child("Fact", "Date"),
        Some(EntityKind::Column),
    )
    .unwrap();
    let variation = date.child(EntityKind::Variation, "Variation").unwrap();
    assert_eq!(
        variation.property_value("defaultHierarchy"),
        Some("LocalDateTable_1.'Date Hierarchy'")
    );
}

// ==================== quoting symmetry at the boundary ====================

#[test]
fn quoting_is_stable_across_repeated_cycles() {
    use tmdl::lex::{quote, unquote};
    for name in ["Total Revenue", "Profit%", "Revenue", "2024 Sales"] {
        let mut current = name.to_string();
        for _ in 0..3 {
            let quoted = quote(&current);
            current = unquote(&quoted).to_string();
        }
        assert_eq!(current, name);
    }
}

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

//! Round-trip serialization for TMDL documents.
//!
//! The writer and the parser agree exactly on canonical formatting, so
//! `emit(parse(t))` reproduces `t` byte for byte when nothing was mutated,
//! and a mutation changes no byte outside the edited region.
//!
//! [`emit_checked`] additionally re-parses the output and structurally
//! compares it with the input tree; a mismatch is an internal defect
//! surfaced as an invariant error, never swallowed.

mod config;
mod writer;

pub use config::EmitConfig;
pub use writer::Writer;

use tmdl_core::{parse, Document, TmdlError, TmdlResult};

/// Serialize a document to text.
pub fn emit(doc: &Document) -> String {
    emit_with_config(doc, &EmitConfig::default())
}

/// Serialize a document with explicit configuration.
pub fn emit_with_config(doc: &Document, config: &EmitConfig) -> String {
    Writer::new(doc, config).write_document(doc)
}

/// Serialize a document, then verify the output re-parses to an equivalent
/// tree.
pub fn emit_checked(doc: &Document) -> TmdlResult<String> {
    let text = emit(doc);
    let reparsed = parse(&text).map_err(|e| {
        TmdlError::invariant(format!("emitted text failed to re-parse: {}", e))
    })?;
    if !doc.structural_eq(&reparsed) {
        return Err(TmdlError::invariant(
            "re-parsed output diverged from the document tree",
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmdl_core::parse;

    #[test]
    fn test_emit_checked_round_trip() {
        let text = "table Fact\n\tlineageTag: t-1\n\n\tcolumn Revenue\n\t\tdataType: double\n\t\tlineageTag: c-1\n";
        let doc = parse(text).unwrap();
        let out = emit_checked(&doc).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_emit_checked_accepts_rendered_entities() {
        let mut doc = parse("table Fact\n").unwrap();
        let table = doc.table_mut("Fact").unwrap();
        let mut m = tmdl_core::Entity::new(tmdl_core::EntityKind::Measure, "Total");
        m.expression = Some("SUM(Fact[Revenue])".into());
        table.children.push(tmdl_core::Node::Entity(m));
        assert!(emit_checked(&doc).is_ok());
    }
}

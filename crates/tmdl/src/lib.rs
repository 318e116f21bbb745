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

//! # TMDL - Tabular Model Definition Language Toolkit
//!
//! Structural, round-trip-safe editing of TMDL semantic-model files:
//! parse a definition into an addressable entity tree, apply one targeted
//! mutation, and re-emit text that is byte-identical everywhere except the
//! edited region. Comments, annotation blocks, multi-line DAX/M bodies,
//! quoting, and authored ordering all survive.
//!
//! ## Quick start
//!
//! ```rust
//! use tmdl::{add, parse, serialize, EntityPath, EntitySpec};
//!
//! let text = "table Fact\n\tlineageTag: t-1\n";
//! let doc = parse(text).expect("parse");
//!
//! // Untouched documents round-trip byte for byte.
//! assert_eq!(serialize(&doc), text);
//!
//! // Mutations return a new document; the input is never half-edited.
//! let spec = EntitySpec::measure("Total", "SUM(Fact[Revenue])");
//! let doc = add(&doc, &EntityPath::table("Fact"), &spec).expect("add");
//! assert!(serialize(&doc).contains("measure Total = SUM(Fact[Revenue])"));
//! ```
//!
//! ## Crates
//!
//! - `tmdl-core`: lexing, tree building, entity mapping, document model
//! - `tmdl-emit`: serialization (raw spans verbatim, canonical rendering)
//! - `tmdl-edit`: add / update / delete / resolve
//!
//! Expression text (DAX, M) is opaque: carried and re-emitted, never
//! evaluated. The core performs no I/O and no locking; callers editing the
//! same file concurrently must serialize access themselves, and persisting
//! an edit should go through a write-then-rename so a crash never leaves a
//! half-written file.

// Re-export core types
pub use tmdl_core::{
    new_lineage_tag,
    parse_with_limits,
    Cardinality,
    Comment,
    CrossFilteringBehavior,
    DataType,
    // Main types
    Document,
    Entity,
    EntityKind,
    IndentUnit,
    // Parser
    Limits,
    Name,
    Newline,
    Node,
    Opaque,
    PartitionMode,
    Property,
    PropertyValue,
    SummarizeBy,
    // Errors
    TmdlError,
    TmdlErrorKind,
    TmdlResult,
};

// Re-export editing types
pub use tmdl_edit::{add_with_policy, EntityPath, EntitySpec, InsertPolicy, PropertyChanges};

// Re-export emission types
pub use tmdl_emit::EmitConfig;

/// Lexical utilities shared by the mapper and the serializer.
pub mod lex {
    //! Identifier quoting rules.
    pub use tmdl_core::lex::{needs_quoting, quote, unquote};
}

/// Parse a TMDL document from a string.
///
/// # Examples
///
/// ```rust
/// let doc = tmdl::parse("table Fact\n\tlineageTag: t-1\n").unwrap();
/// assert!(doc.table("Fact").is_some());
/// ```
#[inline]
pub fn parse(input: &str) -> Result<Document, TmdlError> {
    tmdl_core::parse(input)
}

/// Serialize a document to text.
///
/// Nodes untouched since parse are emitted from their raw spans, so
/// `serialize(parse(t))` reproduces `t` exactly.
#[inline]
pub fn serialize(doc: &Document) -> String {
    tmdl_emit::emit(doc)
}

/// Serialize and verify: the output is re-parsed and structurally compared
/// with the input tree. A divergence is an invariant error (a defect in
/// this library, not in the caller's input).
#[inline]
pub fn serialize_checked(doc: &Document) -> Result<String, TmdlError> {
    tmdl_emit::emit_checked(doc)
}

/// Resolve a path to an entity, read-only.
#[inline]
pub fn resolve<'a>(
    doc: &'a Document,
    path: &EntityPath,
    kind: Option<EntityKind>,
) -> Result<&'a Entity, TmdlError> {
    tmdl_edit::resolve(doc, path, kind)
}

/// Add a new entity under a table. Assigns a fresh lineage tag and inserts
/// at the position the document's own conventions suggest.
#[inline]
pub fn add(doc: &Document, parent: &EntityPath, spec: &EntitySpec) -> Result<Document, TmdlError> {
    tmdl_edit::add(doc, parent, spec)
}

/// Apply property changes to the entity at `path`.
#[inline]
pub fn update(
    doc: &Document,
    path: &EntityPath,
    kind: EntityKind,
    changes: &PropertyChanges,
) -> Result<Document, TmdlError> {
    tmdl_edit::update(doc, path, kind, changes)
}

/// Delete the entity at `path` together with its description comments and
/// one adjacent blank separator.
#[inline]
pub fn delete(doc: &Document, path: &EntityPath, kind: EntityKind) -> Result<Document, TmdlError> {
    tmdl_edit::delete(doc, path, kind)
}

/// Validate that input parses and survives a byte-identical round trip.
///
/// # Examples
///
/// ```rust
/// assert!(tmdl::validate("table Fact\n\tlineageTag: t-1\n").is_ok());
/// assert!(tmdl::validate("\tdangling indent\n").is_err());
/// ```
pub fn validate(input: &str) -> Result<(), TmdlError> {
    let doc = parse(input)?;
    let out = serialize(&doc);
    if out != input {
        return Err(TmdlError::invariant(
            "round trip of unmodified input did not reproduce it byte for byte",
        ));
    }
    Ok(())
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let doc = parse("table Fact\n").unwrap();
        assert_eq!(doc.tables().count(), 1);
    }

    #[test]
    fn test_round_trip() {
        let text = "table Fact\n\tlineageTag: t-1\n\n\tcolumn A\n\t\tdataType: string\n";
        assert_eq!(serialize(&parse(text).unwrap()), text);
    }

    #[test]
    fn test_validate() {
        assert!(validate("table Fact\n\tlineageTag: t-1\n").is_ok());
        assert!(validate("table Fact\n\t\t\tskipped: level\n").is_err());
    }

    #[test]
    fn test_add_then_resolve() {
        let doc = parse("table Fact\n\tlineageTag: t-1\n").unwrap();
        let spec = EntitySpec::measure("Total", "1");
        let doc = add(&doc, &EntityPath::table("Fact"), &spec).unwrap();
        let m = resolve(
            &doc,
            &EntityPath::child("Fact", "Total"),
            Some(EntityKind::Measure),
        )
        .unwrap();
        assert_eq!(m.expression.as_deref(), Some("1"));
    }

    #[test]
    fn test_serialize_checked_on_mutated_document() {
        let doc = parse("table Fact\n\tlineageTag: t-1\n").unwrap();
        let doc = add(
            &doc,
            &EntityPath::table("Fact"),
            &EntitySpec::measure("Total", "SUM(Fact[X])"),
        )
        .unwrap();
        assert!(serialize_checked(&doc).is_ok());
    }
}

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

//! TMDL writer.
//!
//! Walks the document tree in order. A node still carrying its raw span is
//! emitted verbatim, which makes untouched regions byte-identical across a
//! round trip. Dirty or newly created nodes are rendered canonically: one
//! property per line at the node's depth, names quoted by the shared
//! predicate, multi-line expression bodies two units deeper than their
//! declaration.

use crate::config::EmitConfig;
use tmdl_core::{quote, Comment, Document, Entity, IndentUnit, Node, Property, PropertyValue};

/// Initial output buffer capacity; typical table files fit comfortably.
const INITIAL_OUTPUT_BUFFER_CAPACITY: usize = 4096;

/// Extra indentation of an expression body relative to its declaration.
const BODY_INDENT_OFFSET: usize = 2;

/// Writer for TMDL output.
pub struct Writer {
    out: String,
    newline: &'static str,
    indent: IndentUnit,
    trailing_newline: bool,
}

impl Writer {
    /// Create a writer for the given document and configuration.
    pub fn new(doc: &Document, config: &EmitConfig) -> Self {
        Self {
            out: String::with_capacity(INITIAL_OUTPUT_BUFFER_CAPACITY),
            newline: config.newline.unwrap_or(doc.newline).as_str(),
            indent: config.indent.unwrap_or(doc.indent),
            trailing_newline: config.trailing_newline.unwrap_or(doc.trailing_newline),
        }
    }

    /// Write the document and return the output text.
    pub fn write_document(mut self, doc: &Document) -> String {
        self.write_nodes(&doc.nodes, 0);
        if !self.trailing_newline && self.out.ends_with(self.newline) {
            let len = self.out.len() - self.newline.len();
            self.out.truncate(len);
        }
        self.out
    }

    fn push_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push_str(self.newline);
    }

    /// Emit a raw span verbatim. Folded continuation lines are stored
    /// joined with `\n`; re-split so the document newline style applies.
    fn push_raw(&mut self, raw: &str) {
        for line in raw.split('\n') {
            self.push_line(line);
        }
    }

    fn write_nodes(&mut self, nodes: &[Node], depth: usize) {
        for node in nodes {
            match node {
                Node::Blank(raw) => self.push_line(raw),
                Node::Comment(comment) => self.write_comment(comment, depth),
                Node::Property(property) => self.write_property(property, depth),
                Node::Opaque(opaque) => self.push_raw(&opaque.raw),
                Node::Entity(entity) => self.write_entity(entity, depth),
            }
        }
    }

    fn write_entity(&mut self, entity: &Entity, depth: usize) {
        match entity.raw() {
            Some(raw) => self.push_raw(raw),
            None => self.render_declaration(entity, depth),
        }
        self.write_nodes(&entity.children, depth + 1);
    }

    fn render_declaration(&mut self, entity: &Entity, depth: usize) {
        let mut line = self.indent.prefix(depth);
        line.push_str(entity.kind.keyword());
        if !entity.name.value.is_empty() {
            line.push(' ');
            line.push_str(&quote(&entity.name.value));
        }
        match entity.expression.as_deref() {
            None => self.push_line(&line),
            Some(expr) if expr.is_empty() => {
                line.push_str(" =");
                self.push_line(&line);
            }
            Some(expr) if !expr.contains('\n') => {
                line.push_str(" = ");
                line.push_str(expr);
                self.push_line(&line);
            }
            Some(expr) => {
                line.push_str(" =");
                self.push_line(&line);
                self.render_body(expr, depth);
            }
        }
    }

    fn render_body(&mut self, body: &str, decl_depth: usize) {
        let prefix = self.indent.prefix(decl_depth + BODY_INDENT_OFFSET);
        for body_line in body.split('\n') {
            if body_line.is_empty() {
                self.push_line("");
            } else {
                let mut line = prefix.clone();
                line.push_str(body_line);
                self.push_line(&line);
            }
        }
    }

    fn write_property(&mut self, property: &Property, depth: usize) {
        if let Some(raw) = property.raw() {
            self.push_raw(raw);
            return;
        }
        let mut line = self.indent.prefix(depth);
        line.push_str(&property.key);
        match &property.value {
            PropertyValue::Flag => self.push_line(&line),
            PropertyValue::Scalar(s) if s.is_empty() => {
                line.push(':');
                self.push_line(&line);
            }
            PropertyValue::Scalar(s) => {
                line.push_str(": ");
                line.push_str(s);
                self.push_line(&line);
            }
            PropertyValue::Expression(e) if e.contains('\n') => {
                line.push_str(" =");
                self.push_line(&line);
                self.render_body(e, depth);
            }
            PropertyValue::Expression(e) if e.is_empty() => {
                line.push_str(" =");
                self.push_line(&line);
            }
            PropertyValue::Expression(e) => {
                line.push_str(" = ");
                line.push_str(e);
                self.push_line(&line);
            }
        }
    }

    fn write_comment(&mut self, comment: &Comment, depth: usize) {
        if let Some(raw) = comment.raw() {
            self.push_raw(raw);
            return;
        }
        let mut line = self.indent.prefix(depth);
        line.push_str(if comment.doc { "/// " } else { "// " });
        line.push_str(&comment.text);
        self.push_line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmdl_core::{parse, Entity, EntityKind, Newline, Property};

    fn emit_default(doc: &Document) -> String {
        let config = EmitConfig::default();
        Writer::new(doc, &config).write_document(doc)
    }

    // ==================== raw-span round trips ====================

    #[test]
    fn test_untouched_document_is_byte_identical() {
        let text = "table Fact\n\tlineageTag: t-1\n\n\tmeasure 'Total Revenue' = SUM(Fact[Revenue])\n\t\tlineageTag: m-1\n";
        let doc = parse(text).unwrap();
        assert_eq!(emit_default(&doc), text);
    }

    #[test]
    fn test_untouched_crlf_document_is_byte_identical() {
        let text = "table Fact\r\n\tlineageTag: t-1\r\n";
        let doc = parse(text).unwrap();
        assert_eq!(emit_default(&doc), text);
    }

    #[test]
    fn test_no_trailing_newline_preserved() {
        let text = "table Fact\n\tlineageTag: t-1";
        let doc = parse(text).unwrap();
        assert_eq!(emit_default(&doc), text);
    }

    #[test]
    fn test_multiline_body_round_trips() {
        let text = "table Fact\n\tmeasure Total =\n\t\t\tVAR x = 1\n\t\t\tRETURN x\n\t\tlineageTag: m-1\n";
        let doc = parse(text).unwrap();
        assert_eq!(emit_default(&doc), text);
    }

    // ==================== rendered nodes ====================

    #[test]
    fn test_renders_new_measure() {
        let mut doc = parse("table Fact\n").unwrap();
        let table = doc.table_mut("Fact").unwrap();
        let mut measure = Entity::new(EntityKind::Measure, "Total Revenue");
        measure.expression = Some("SUM(Fact[Revenue])".into());
        measure
            .children
            .push(tmdl_core::Node::Property(Property::scalar(
                "lineageTag",
                "m-1",
            )));
        table.children.push(tmdl_core::Node::Entity(measure));
        let out = emit_default(&doc);
        assert_eq!(
            out,
            "table Fact\n\tmeasure 'Total Revenue' = SUM(Fact[Revenue])\n\t\tlineageTag: m-1\n"
        );
    }

    #[test]
    fn test_renders_multiline_expression_two_units_deeper() {
        let mut doc = parse("table Fact\n").unwrap();
        let table = doc.table_mut("Fact").unwrap();
        let mut measure = Entity::new(EntityKind::Measure, "Total");
        measure.expression = Some("VAR x = 1\nRETURN x".into());
        table.children.push(tmdl_core::Node::Entity(measure));
        let out = emit_default(&doc);
        assert_eq!(
            out,
            "table Fact\n\tmeasure Total =\n\t\t\tVAR x = 1\n\t\t\tRETURN x\n"
        );
    }

    #[test]
    fn test_renders_flag_property() {
        let mut doc = parse("table Fact\n").unwrap();
        let table = doc.table_mut("Fact").unwrap();
        table
            .children
            .push(tmdl_core::Node::Property(Property::flag("isHidden")));
        assert_eq!(emit_default(&doc), "table Fact\n\tisHidden\n");
    }

    #[test]
    fn test_rendered_nodes_follow_detected_indent() {
        let mut doc = parse("table Fact\n    lineageTag: t-1\n").unwrap();
        let table = doc.table_mut("Fact").unwrap();
        table
            .children
            .push(tmdl_core::Node::Property(Property::flag("isHidden")));
        assert_eq!(
            emit_default(&doc),
            "table Fact\n    lineageTag: t-1\n    isHidden\n"
        );
    }

    #[test]
    fn test_newline_override_applies_to_raw_spans() {
        let doc = parse("table Fact\n\tlineageTag: t-1\n").unwrap();
        let config = EmitConfig::new().with_newline(Newline::CrLf);
        let out = Writer::new(&doc, &config).write_document(&doc);
        assert_eq!(out, "table Fact\r\n\tlineageTag: t-1\r\n");
    }
}

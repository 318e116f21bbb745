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

//! Document structure for parsed TMDL.
//!
//! The document owns an ordered tree of nodes mirroring the authored file:
//! typed entities, property lines, comments, blank separators, and opaque
//! pass-through spans for structure outside the recognized grammar. Every
//! node parsed from text keeps its raw span; the serializer emits raw spans
//! verbatim, so untouched regions are byte-identical across a round trip.
//! Mutations clear the raw span of exactly the nodes they change.

use crate::lex::ident::{quote, unquote};
use crate::lex::segment::{IndentUnit, Newline};
use crate::value::DataType;

/// The kind of a typed entity, keyed by its declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Model,
    Table,
    Column,
    Measure,
    Hierarchy,
    Level,
    Partition,
    Relationship,
    Annotation,
    CalculationGroup,
    CalculationItem,
    Variation,
    CultureInfo,
    Database,
}

impl EntityKind {
    /// The declaration keyword for this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Table => "table",
            Self::Column => "column",
            Self::Measure => "measure",
            Self::Hierarchy => "hierarchy",
            Self::Level => "level",
            Self::Partition => "partition",
            Self::Relationship => "relationship",
            Self::Annotation => "annotation",
            Self::CalculationGroup => "calculationGroup",
            Self::CalculationItem => "calculationItem",
            Self::Variation => "variation",
            Self::CultureInfo => "cultureInfo",
            Self::Database => "database",
        }
    }

    /// Map a declaration keyword to its kind.
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "model" => Some(Self::Model),
            "table" => Some(Self::Table),
            "column" => Some(Self::Column),
            "measure" => Some(Self::Measure),
            "hierarchy" => Some(Self::Hierarchy),
            "level" => Some(Self::Level),
            "partition" => Some(Self::Partition),
            "relationship" => Some(Self::Relationship),
            "annotation" => Some(Self::Annotation),
            "calculationGroup" => Some(Self::CalculationGroup),
            "calculationItem" => Some(Self::CalculationItem),
            "variation" => Some(Self::Variation),
            "cultureInfo" => Some(Self::CultureInfo),
            "database" => Some(Self::Database),
            _ => None,
        }
    }
}

/// An entity name: the authored raw form and the unquoted logical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// As authored, quotes included.
    pub raw: String,
    /// Logical (unquoted) form.
    pub value: String,
}

impl Name {
    /// From the authored declaration text.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = unquote(&raw).to_string();
        Self { raw, value }
    }

    /// From a logical name; the raw form is derived by the quoting rules.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            raw: quote(&value),
            value,
        }
    }
}

/// The value carried by a property line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// `key: value` — the literal text after the colon, verbatim.
    Scalar(String),
    /// `key = expression` — opaque expression text, possibly multi-line.
    Expression(String),
    /// A bare boolean flag such as `isHidden`.
    Flag,
}

/// A property line belonging to an entity (or to the file's leading block).
#[derive(Debug, Clone)]
pub struct Property {
    pub key: String,
    pub value: PropertyValue,
    /// Whether the key is in the recognized schema for its owner's kind.
    /// Unrecognized properties pass through verbatim.
    pub recognized: bool,
    pub line: usize,
    raw: Option<String>,
}

impl Property {
    pub(crate) fn parsed(
        key: impl Into<String>,
        value: PropertyValue,
        recognized: bool,
        raw: String,
        line: usize,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            recognized,
            line,
            raw: Some(raw),
        }
    }

    /// A freshly created scalar property; rendered canonically on emission.
    pub fn scalar(key: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Scalar(literal.into()),
            recognized: true,
            line: 0,
            raw: None,
        }
    }

    /// A freshly created bare flag property.
    pub fn flag(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Flag,
            recognized: true,
            line: 0,
            raw: None,
        }
    }

    /// A freshly created expression-valued property.
    pub fn expression(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Expression(text.into()),
            recognized: true,
            line: 0,
            raw: None,
        }
    }

    /// The original physical text, if this property is untouched since parse.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Replace the value, discarding the raw span so the line is re-rendered.
    pub fn set_value(&mut self, value: PropertyValue) {
        self.value = value;
        self.raw = None;
    }

    /// The scalar literal, verbatim (quotes included if authored).
    pub fn scalar_literal(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The scalar value with one layer of quotes stripped.
    pub fn scalar_unquoted(&self) -> Option<&str> {
        self.scalar_literal().map(unquote)
    }
}

/// A comment line. `///` comments are doc comments (entity descriptions);
/// `//` comments are plain.
#[derive(Debug, Clone)]
pub struct Comment {
    pub text: String,
    pub doc: bool,
    pub line: usize,
    raw: Option<String>,
}

impl Comment {
    pub(crate) fn parsed(text: impl Into<String>, doc: bool, raw: String, line: usize) -> Self {
        Self {
            text: text.into(),
            doc,
            line,
            raw: Some(raw),
        }
    }

    /// A freshly created doc comment (`/// text`).
    pub fn doc(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            doc: true,
            line: 0,
            raw: None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

/// An opaque pass-through span: structure outside the recognized grammar,
/// preserved verbatim (possibly a whole subtree).
#[derive(Debug, Clone)]
pub struct Opaque {
    /// Verbatim physical text, physical lines joined with `\n`.
    pub raw: String,
    pub line: usize,
}

/// A typed entity: declaration line plus an ordered child sequence.
#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: Name,
    /// Opaque expression text for `= expression` declarations.
    pub expression: Option<String>,
    pub children: Vec<Node>,
    pub line: usize,
    raw: Option<String>,
}

impl Entity {
    pub(crate) fn parsed(
        kind: EntityKind,
        name: Name,
        expression: Option<String>,
        children: Vec<Node>,
        raw: String,
        line: usize,
    ) -> Self {
        Self {
            kind,
            name,
            expression,
            children,
            line,
            raw: Some(raw),
        }
    }

    /// A freshly created entity; rendered canonically on emission.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Name::new(name),
            expression: None,
            children: Vec::new(),
            line: 0,
            raw: None,
        }
    }

    /// The original declaration text (with any folded expression body), if
    /// this entity's own lines are untouched since parse.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Replace the expression, discarding the raw span so the declaration is
    /// re-rendered. Children are unaffected.
    pub fn set_expression(&mut self, text: impl Into<String>) {
        self.expression = Some(text.into());
        self.raw = None;
    }

    /// Child entities, in authored order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.children.iter().filter_map(|n| match n {
            Node::Entity(e) => Some(e),
            _ => None,
        })
    }

    /// Child entities of one kind, in authored order.
    pub fn entities_of(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> + '_ {
        self.entities().filter(move |e| e.kind == kind)
    }

    /// Find a child entity by kind and logical name.
    pub fn child(&self, kind: EntityKind, name: &str) -> Option<&Entity> {
        let wanted = unquote(name);
        self.entities_of(kind).find(|e| e.name.value == wanted)
    }

    /// Find a property line by key.
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.children.iter().find_map(|n| match n {
            Node::Property(p) if p.key == key => Some(p),
            _ => None,
        })
    }

    pub fn property_mut(&mut self, key: &str) -> Option<&mut Property> {
        self.children.iter_mut().find_map(|n| match n {
            Node::Property(p) if p.key == key => Some(p),
            _ => None,
        })
    }

    /// The scalar literal of a property, if present.
    pub fn property_value(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(|p| p.scalar_literal())
    }

    /// The entity's lineage tag, if one is declared.
    pub fn lineage_tag(&self) -> Option<&str> {
        self.property_value("lineageTag")
    }

    /// The declared data type, if present and recognized.
    pub fn data_type(&self) -> Option<DataType> {
        self.property("dataType")
            .and_then(|p| p.scalar_unquoted())
            .and_then(DataType::parse)
    }

    /// Whether the `isHidden` flag (or `isHidden: true`) is present.
    pub fn is_hidden(&self) -> bool {
        match self.property("isHidden") {
            Some(p) => match &p.value {
                PropertyValue::Flag => true,
                PropertyValue::Scalar(s) => s.as_str() == "true",
                PropertyValue::Expression(_) => false,
            },
            None => false,
        }
    }

    /// Whether this is a calculated column (a column with an expression).
    pub fn is_calculated(&self) -> bool {
        self.kind == EntityKind::Column && self.expression.is_some()
    }
}

/// A node of the document tree.
#[derive(Debug, Clone)]
pub enum Node {
    Entity(Entity),
    Property(Property),
    Comment(Comment),
    /// A blank separator line; the string is its raw text (usually empty,
    /// sometimes stray whitespace that must survive a round trip).
    Blank(String),
    Opaque(Opaque),
}

impl Node {
    /// The contained entity, if this node is one.
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Whether this node is a blank separator.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }
}

/// A parsed TMDL document.
///
/// Built once per parse call and discarded after serialization; never shared
/// across files. The tree exclusively owns all descendant nodes.
#[derive(Debug, Clone)]
pub struct Document {
    /// Top-level nodes in authored order.
    pub nodes: Vec<Node>,
    /// Detected newline style.
    pub newline: Newline,
    /// Detected indentation unit.
    pub indent: IndentUnit,
    /// Whether the file ends with a newline.
    pub trailing_newline: bool,
}

impl Document {
    /// An empty document with the given conventions.
    pub fn new(indent: IndentUnit, newline: Newline) -> Self {
        Self {
            nodes: Vec::new(),
            newline,
            indent,
            trailing_newline: true,
        }
    }

    /// Top-level entities, in authored order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Entity(e) => Some(e),
            _ => None,
        })
    }

    /// Top-level tables, in authored order.
    pub fn tables(&self) -> impl Iterator<Item = &Entity> {
        self.entities().filter(|e| e.kind == EntityKind::Table)
    }

    /// Find a table by logical name.
    pub fn table(&self, name: &str) -> Option<&Entity> {
        let wanted = unquote(name);
        self.tables().find(|t| t.name.value == wanted)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Entity> {
        let wanted = unquote(name).to_string();
        self.nodes.iter_mut().find_map(|n| match n {
            Node::Entity(e) if e.kind == EntityKind::Table && e.name.value == wanted => Some(e),
            _ => None,
        })
    }

    /// Structural equality: same entities, properties, comments, and
    /// separators, ignoring raw spans. Used by the serializer's self-check.
    pub fn structural_eq(&self, other: &Self) -> bool {
        nodes_structural_eq(&self.nodes, &other.nodes)
    }
}

fn nodes_structural_eq(a: &[Node], b: &[Node]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| node_structural_eq(x, y))
}

fn node_structural_eq(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Blank(_), Node::Blank(_)) => true,
        (Node::Comment(x), Node::Comment(y)) => x.doc == y.doc && x.text == y.text,
        (Node::Property(x), Node::Property(y)) => x.key == y.key && x.value == y.value,
        (Node::Opaque(x), Node::Opaque(y)) => x.raw == y.raw,
        (Node::Entity(x), Node::Entity(y)) => {
            x.kind == y.kind
                && x.name.value == y.name.value
                && x.expression == y.expression
                && nodes_structural_eq(&x.children, &y.children)
        }
        _ => false,
    }
}

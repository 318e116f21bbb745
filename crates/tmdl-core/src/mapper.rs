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

//! Entity mapping: classify raw tree nodes into typed document nodes.
//!
//! Classification is by leading keyword. An unrecognized keyword at the top
//! level of a file is an error; unrecognized nested structure becomes an
//! opaque pass-through span instead, so a round trip never drops content
//! the grammar has not caught up with.

use crate::document::{Comment, Entity, EntityKind, Name, Node, Opaque, Property, PropertyValue};
use crate::error::{TmdlError, TmdlResult};
use crate::lex::segment::Segment;
use crate::tree::TreeNode;

/// Property keys recognized for each entity kind. Anything else on an
/// entity passes through verbatim.
fn recognized_keys(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Model => &[
            "culture",
            "defaultPowerBIDataSourceVersion",
            "discourageImplicitMeasures",
            "sourceQueryCulture",
        ],
        EntityKind::Table => &[
            "lineageTag",
            "isHidden",
            "isPrivate",
            "showAsVariationsOnly",
            "dataCategory",
        ],
        EntityKind::Column => &[
            "dataType",
            "lineageTag",
            "summarizeBy",
            "formatString",
            "sourceColumn",
            "dataCategory",
            "sortByColumn",
            "isHidden",
            "isNameInferred",
            "isKey",
            "displayFolder",
        ],
        EntityKind::Measure => &["lineageTag", "formatString", "isHidden", "displayFolder"],
        EntityKind::Hierarchy => &["lineageTag", "displayFolder"],
        EntityKind::Level => &["lineageTag", "column", "ordinal"],
        EntityKind::Partition => &["mode", "source", "dataView"],
        EntityKind::Relationship => &[
            "fromColumn",
            "toColumn",
            "cardinality",
            "crossFilteringBehavior",
            "isActive",
            "joinOnDateBehavior",
            "securityFilteringBehavior",
        ],
        EntityKind::Annotation => &[],
        EntityKind::CalculationGroup => &["precedence"],
        EntityKind::CalculationItem => &["ordinal"],
        EntityKind::Variation => &["isDefault", "relationship", "defaultHierarchy"],
        EntityKind::CultureInfo => &["contentType"],
        EntityKind::Database => &["compatibilityLevel"],
    }
}

fn is_recognized(parent: Option<EntityKind>, key: &str) -> bool {
    parent
        .map(|kind| recognized_keys(kind).contains(&key))
        .unwrap_or(false)
}

/// Split a declaration remainder into the raw name and an optional inline
/// expression. Quoted names may contain `=`; bare names may not.
fn split_decl(rest: &str) -> (String, Option<String>) {
    let s = rest.trim();
    if let Some(q) = s.chars().next().filter(|c| *c == '\'' || *c == '"') {
        if let Some(end) = s[1..].find(q) {
            let name = &s[..end + 2];
            let tail = s[end + 2..].trim_start();
            if let Some(expr) = tail.strip_prefix('=') {
                return (name.to_string(), Some(expr.trim().to_string()));
            }
            return (name.to_string(), None);
        }
    }
    if let Some(pos) = s.find('=') {
        (
            s[..pos].trim_end().to_string(),
            Some(s[pos + 1..].trim().to_string()),
        )
    } else {
        (s.to_string(), None)
    }
}

fn flatten_raw(seg: &Segment, children: &[TreeNode]) -> String {
    let mut out = seg.raw.clone();
    for child in children {
        out.push('\n');
        out.push_str(&child.flatten_raw());
    }
    out
}

/// Map the raw tree into typed document nodes.
pub(crate) fn map_document(roots: Vec<TreeNode>) -> TmdlResult<Vec<Node>> {
    roots.into_iter().map(|n| map_node(n, None)).collect()
}

fn map_node(node: TreeNode, parent: Option<EntityKind>) -> TmdlResult<Node> {
    let TreeNode { seg, children } = node;

    if seg.blank {
        return Ok(Node::Blank(seg.raw));
    }

    let line = seg.line;
    let content = seg.content.clone();

    if content.starts_with("//") {
        if !children.is_empty() {
            return Ok(Node::Opaque(Opaque {
                raw: flatten_raw(&seg, &children),
                line,
            }));
        }
        let (doc, text) = match content.strip_prefix("///") {
            Some(rest) => (true, rest),
            None => (false, &content[2..]),
        };
        return Ok(Node::Comment(Comment::parsed(text.trim(), doc, seg.raw, line)));
    }

    let token = content.split_whitespace().next().unwrap_or("");
    if let Some(kind) = EntityKind::from_keyword(token) {
        let rest = content[token.len()..].trim_start();
        let (name_raw, inline) = split_decl(rest);
        let expression = match (seg.body.clone(), inline) {
            (Some(body), _) => Some(body),
            (None, other) => other,
        };
        let mapped = children
            .into_iter()
            .map(|c| map_node(c, Some(kind)))
            .collect::<TmdlResult<Vec<_>>>()?;
        return Ok(Node::Entity(Entity::parsed(
            kind,
            Name::from_raw(name_raw),
            expression,
            mapped,
            seg.raw,
            line,
        )));
    }

    if children.is_empty() {
        if let Some(pos) = content.find(':') {
            let key = &content[..pos];
            if !key.is_empty() && !key.contains(char::is_whitespace) {
                let value = content[pos + 1..].trim().to_string();
                let recognized = is_recognized(parent, key);
                return Ok(Node::Property(Property::parsed(
                    key,
                    PropertyValue::Scalar(value),
                    recognized,
                    seg.raw,
                    line,
                )));
            }
        }
        if let Some(pos) = content.find('=') {
            let key = content[..pos].trim();
            if !key.is_empty() && !key.contains(char::is_whitespace) {
                let text = seg
                    .body
                    .clone()
                    .unwrap_or_else(|| content[pos + 1..].trim().to_string());
                let recognized = is_recognized(parent, key);
                return Ok(Node::Property(Property::parsed(
                    key,
                    PropertyValue::Expression(text),
                    recognized,
                    seg.raw,
                    line,
                )));
            }
        }
        if parent.is_some() && !content.contains(char::is_whitespace) {
            let recognized = is_recognized(parent, &content);
            return Ok(Node::Property(Property::parsed(
                content.clone(),
                PropertyValue::Flag,
                recognized,
                seg.raw,
                line,
            )));
        }
    }

    if parent.is_none() {
        // `ref table X` / `ref cultureInfo X` lines pass through at the top
        // level; anything else unrecognized there is a hard error.
        if token == "ref" {
            return Ok(Node::Opaque(Opaque {
                raw: flatten_raw(&seg, &children),
                line,
            }));
        }
        return Err(TmdlError::unknown_keyword(
            format!("unrecognized top-level keyword '{}'", token),
            line,
        ));
    }

    Ok(Node::Opaque(Opaque {
        raw: flatten_raw(&seg, &children),
        line,
    }))
}

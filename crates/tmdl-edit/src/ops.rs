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

//! Mutation operations: add, update, delete.
//!
//! Every operation takes the document by reference and returns a new
//! document, so a failure can never leave a partially mutated tree in the
//! caller's hands. Operations touch only the nodes they change; everything
//! else keeps its raw span and round-trips byte-identically.
//!
//! Blank-separator bookkeeping is symmetric between add and delete: adding
//! an entity places one blank line toward each neighbor, and deleting it
//! removes the entity, its description comments, and one adjacent blank,
//! so an add followed by a delete restores the surrounding text exactly.

use crate::path::{find_table, EntityPath};
use crate::policy::InsertPolicy;
use crate::spec::{EntitySpec, PropertyChanges};
use tmdl_core::{
    new_lineage_tag, unquote, Comment, DataType, Document, Entity, EntityKind, Node, Property,
    PropertyValue, TmdlError, TmdlResult,
};

/// Add a new entity under the given table, using the default insert policy.
pub fn add(doc: &Document, parent: &EntityPath, spec: &EntitySpec) -> TmdlResult<Document> {
    add_with_policy(doc, parent, spec, &InsertPolicy::default())
}

/// Add a new entity under the given table.
///
/// Fails with a duplicate-name error if a sibling of the same kind and name
/// exists, and with a not-found error if the table does not resolve. The
/// new entity receives a fresh lineage tag.
pub fn add_with_policy(
    doc: &Document,
    parent: &EntityPath,
    spec: &EntitySpec,
    policy: &InsertPolicy,
) -> TmdlResult<Document> {
    spec.validate()?;
    if !parent.children.is_empty() {
        return Err(TmdlError::unsupported_property(
            "add target must be a table",
        ));
    }
    find_table(doc, &parent.table)?;

    let mut out = doc.clone();
    let table = out
        .table_mut(&parent.table)
        .ok_or_else(|| TmdlError::not_found(format!("table '{}' not found", parent.table)))?;

    let wanted = unquote(&spec.name).to_string();
    if table.entities_of(spec.kind).any(|e| e.name.value == wanted) {
        return Err(TmdlError::duplicate_name(format!(
            "{} '{}' already exists in table '{}'",
            spec.kind.keyword(),
            wanted,
            table.name.value
        )));
    }

    let entity = render_spec(spec);
    let idx = policy.position(table, spec.kind);
    insert_block(
        &mut table.children,
        idx,
        spec.description.as_deref(),
        entity,
        policy.blank_separator,
    );
    Ok(out)
}

/// Apply property changes to the entity at `path`.
///
/// With child segments the change targets the addressed descendant (the
/// final segment must be of the given kind); without them it targets the
/// table itself. Unspecified properties are untouched and the lineage tag
/// is never altered.
pub fn update(
    doc: &Document,
    path: &EntityPath,
    kind: EntityKind,
    changes: &PropertyChanges,
) -> TmdlResult<Document> {
    let mut out = doc.clone();
    {
        let (children, idx) = locate_mut(&mut out, path, kind)?;
        apply_changes(children, idx, changes)?;
    }
    Ok(out)
}

/// Delete the entity at `path`, including its description comments and one
/// adjacent blank separator.
pub fn delete(doc: &Document, path: &EntityPath, kind: EntityKind) -> TmdlResult<Document> {
    let mut out = doc.clone();
    {
        let (children, idx) = locate_mut(&mut out, path, kind)?;
        remove_block(children, idx);
    }
    Ok(out)
}

fn top_level_table_index(doc: &Document, name: &str) -> TmdlResult<usize> {
    let wanted = unquote(name);
    doc.nodes
        .iter()
        .position(|n| {
            matches!(n, Node::Entity(e) if e.kind == EntityKind::Table && e.name.value == wanted)
        })
        .ok_or_else(|| TmdlError::not_found(format!("table '{}' not found", wanted)))
}

/// Walk the path down the tree, returning the owning child vector and the
/// index of the addressed entity within it. Intermediate segments match any
/// entity kind; the final segment must match `kind`.
fn locate_mut<'a>(
    doc: &'a mut Document,
    path: &EntityPath,
    kind: EntityKind,
) -> TmdlResult<(&'a mut Vec<Node>, usize)> {
    let ti = top_level_table_index(doc, &path.table)?;
    let mut children: &mut Vec<Node> = &mut doc.nodes;
    let mut idx = ti;
    for (i, segment) in path.children.iter().enumerate() {
        let parent = match &mut children[idx] {
            Node::Entity(e) => e,
            _ => unreachable!("index addresses an entity node"),
        };
        let wanted = unquote(segment);
        let last = i + 1 == path.children.len();
        let pos = parent.children.iter().position(|n| {
            matches!(n, Node::Entity(e) if e.name.value == wanted && (!last || e.kind == kind))
        });
        let parent_name = parent.name.value.clone();
        children = &mut parent.children;
        idx = pos.ok_or_else(|| {
            TmdlError::not_found(format!(
                "{} '{}' not found",
                if last { kind.keyword() } else { "entity" },
                wanted
            ))
            .with_context(format!("in '{}'", parent_name))
        })?;
    }
    Ok((children, idx))
}

/// Render an entity spec into a fresh, dirty entity tree.
fn render_spec(spec: &EntitySpec) -> Entity {
    let mut entity = Entity::new(spec.kind, unquote(&spec.name));
    entity.expression = spec.expression.clone();
    let mut props: Vec<Node> = Vec::new();
    match spec.kind {
        EntityKind::Column => {
            let data_type = spec.data_type.unwrap_or(DataType::String);
            props.push(Node::Property(Property::scalar("dataType", data_type.as_str())));
            props.push(Node::Property(Property::scalar(
                "lineageTag",
                new_lineage_tag(),
            )));
            if let Some(fs) = &spec.format_string {
                props.push(Node::Property(Property::scalar(
                    "formatString",
                    format_scalar_string(fs),
                )));
            }
            if let Some(sb) = spec.summarize_by {
                props.push(Node::Property(Property::scalar("summarizeBy", sb.as_str())));
            }
            if spec.is_hidden {
                props.push(Node::Property(Property::flag("isHidden")));
            }
        }
        EntityKind::Measure => {
            props.push(Node::Property(Property::scalar(
                "lineageTag",
                new_lineage_tag(),
            )));
            if let Some(fs) = &spec.format_string {
                props.push(Node::Property(Property::scalar(
                    "formatString",
                    format_scalar_string(fs),
                )));
            }
            if spec.is_hidden {
                props.push(Node::Property(Property::flag("isHidden")));
            }
        }
        _ => {}
    }
    entity.children = props;
    entity
}

/// Insert a description run plus entity at `idx`, keeping one blank
/// separator toward each existing neighbor.
fn insert_block(
    children: &mut Vec<Node>,
    idx: usize,
    description: Option<&str>,
    entity: Entity,
    blank_separator: bool,
) {
    let mut block: Vec<Node> = Vec::new();
    if let Some(desc) = description {
        for line in desc.lines() {
            block.push(Node::Comment(Comment::doc(line.trim())));
        }
    }
    block.push(Node::Entity(entity));
    if blank_separator && idx < children.len() && !children[idx].is_blank() {
        block.push(Node::Blank(String::new()));
    }
    if blank_separator && idx > 0 && !children[idx - 1].is_blank() {
        block.insert(0, Node::Blank(String::new()));
    }
    children.splice(idx..idx, block);
}

/// Remove the entity at `idx` with its description comments and one
/// adjacent blank separator.
fn remove_block(children: &mut Vec<Node>, idx: usize) {
    let mut start = idx;
    while start > 0 && matches!(&children[start - 1], Node::Comment(c) if c.doc) {
        start -= 1;
    }
    children.drain(start..=idx);
    let next_blank = children.get(start).map(Node::is_blank).unwrap_or(false);
    let next_exists = start < children.len();
    if start > 0 && children[start - 1].is_blank() && (next_blank || !next_exists) {
        children.remove(start - 1);
    } else if start == 0 && next_blank {
        children.remove(0);
    }
}

fn apply_changes(
    children: &mut Vec<Node>,
    idx: usize,
    changes: &PropertyChanges,
) -> TmdlResult<()> {
    {
        let entity = match &children[idx] {
            Node::Entity(e) => e,
            _ => unreachable!("index addresses an entity node"),
        };
        if let Some(expr) = &changes.expression {
            match entity.kind {
                EntityKind::Measure | EntityKind::CalculationItem => {}
                EntityKind::Column if entity.is_calculated() => {}
                EntityKind::Column => {
                    return Err(TmdlError::unsupported_property(
                        "cannot add an expression to a regular column; create a calculated column instead",
                    ));
                }
                other => {
                    return Err(TmdlError::unsupported_property(format!(
                        "expression updates are not supported for {} entities",
                        other.keyword()
                    )));
                }
            }
            if expr.trim().is_empty() {
                return Err(TmdlError::unsupported_property(
                    "cannot remove the expression from a calculated entity; delete and re-create it instead",
                ));
            }
        }
    }

    {
        let entity = match &mut children[idx] {
            Node::Entity(e) => e,
            _ => unreachable!("index addresses an entity node"),
        };
        if let Some(expr) = &changes.expression {
            entity.set_expression(expr.clone());
        }
        if let Some(dt) = changes.data_type {
            set_scalar(entity, "dataType", dt.as_str().to_string());
        }
        if let Some(fs) = &changes.format_string {
            set_scalar(entity, "formatString", format_scalar_string(fs));
        }
        if let Some(sb) = changes.summarize_by {
            set_scalar(entity, "summarizeBy", sb.as_str().to_string());
        }
        if let Some(hidden) = changes.is_hidden {
            set_flag(entity, "isHidden", hidden);
        }
    }

    if let Some(desc) = &changes.description {
        rewrite_description(children, idx, desc);
    }
    Ok(())
}

/// Replace a scalar property's value in place, or insert the property
/// after the last existing property line.
fn set_scalar(entity: &mut Entity, key: &str, literal: String) {
    if let Some(p) = entity.property_mut(key) {
        p.set_value(PropertyValue::Scalar(literal));
        return;
    }
    let at = last_property_index(entity).map(|i| i + 1).unwrap_or(0);
    entity
        .children
        .insert(at, Node::Property(Property::scalar(key, literal)));
}

fn set_flag(entity: &mut Entity, key: &str, on: bool) {
    if on {
        if let Some(p) = entity.property_mut(key) {
            if !matches!(p.value, PropertyValue::Flag) {
                p.set_value(PropertyValue::Flag);
            }
        } else {
            let at = last_property_index(entity).map(|i| i + 1).unwrap_or(0);
            entity
                .children
                .insert(at, Node::Property(Property::flag(key)));
        }
    } else if let Some(pos) = entity
        .children
        .iter()
        .position(|n| matches!(n, Node::Property(p) if p.key == key))
    {
        entity.children.remove(pos);
    }
}

fn last_property_index(entity: &Entity) -> Option<usize> {
    entity
        .children
        .iter()
        .rposition(|n| matches!(n, Node::Property(_)))
}

/// Replace the `///` description run above the entity at `idx`. An empty
/// description removes the run.
fn rewrite_description(children: &mut Vec<Node>, idx: usize, description: &str) {
    let mut start = idx;
    while start > 0 && matches!(&children[start - 1], Node::Comment(c) if c.doc) {
        start -= 1;
    }
    children.drain(start..idx);
    let mut at = start;
    for line in description.lines() {
        children.insert(at, Node::Comment(Comment::doc(line.trim())));
        at += 1;
    }
}

/// Quote a string literal for a property value unless it already is.
fn format_scalar_string(value: &str) -> String {
    let already_quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if already_quoted {
        value.to_string()
    } else {
        format!("\"{}\"", value)
    }
}

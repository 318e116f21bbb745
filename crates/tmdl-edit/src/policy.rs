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

//! Insertion policy for newly added entities.
//!
//! Where a new entity lands among its siblings is an authoring convention,
//! not a grammar rule, so it is data rather than hard-coded logic. The
//! default reproduces the convention of the common authoring tools: after
//! the last sibling of the same kind; a measure with no peers before the
//! first column or partition; a column with no peers before the first
//! partition; otherwise at the end of the parent.

use tmdl_core::{Entity, EntityKind, Node};

/// Policy controlling where an added entity is inserted.
#[derive(Debug, Clone)]
pub struct InsertPolicy {
    /// Keep one blank separator line toward each neighbor.
    pub blank_separator: bool,
    /// Kinds a measure with no peers is anchored before.
    pub measure_anchors: Vec<EntityKind>,
    /// Kinds a column with no peers is anchored before.
    pub column_anchors: Vec<EntityKind>,
}

impl Default for InsertPolicy {
    fn default() -> Self {
        Self {
            blank_separator: true,
            measure_anchors: vec![EntityKind::Column, EntityKind::Partition],
            column_anchors: vec![EntityKind::Partition],
        }
    }
}

impl InsertPolicy {
    /// Index in `parent.children` where a new entity of `kind` goes.
    pub fn position(&self, parent: &Entity, kind: EntityKind) -> usize {
        if let Some(last) = parent
            .children
            .iter()
            .rposition(|n| matches!(n, Node::Entity(e) if e.kind == kind))
        {
            return last + 1;
        }
        let anchors: &[EntityKind] = match kind {
            EntityKind::Measure => &self.measure_anchors,
            EntityKind::Column => &self.column_anchors,
            _ => &[],
        };
        for (i, node) in parent.children.iter().enumerate() {
            if let Node::Entity(e) = node {
                if anchors.contains(&e.kind) {
                    return back_over_doc_comments(parent, i);
                }
            }
        }
        parent.children.len()
    }
}

/// Step back over the doc comments that describe the entity at `idx`, so
/// an insertion before it does not split a description from its entity.
fn back_over_doc_comments(parent: &Entity, mut idx: usize) -> usize {
    while idx > 0 && matches!(&parent.children[idx - 1], Node::Comment(c) if c.doc) {
        idx -= 1;
    }
    idx
}

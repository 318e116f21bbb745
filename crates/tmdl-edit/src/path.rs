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

//! Entity paths: a table name plus a (usually one-deep) chain of child
//! names. Most edits address a direct table child; nested segments reach
//! grandchildren such as hierarchy levels.
//!
//! Names may be given quoted or unquoted; resolution always compares the
//! logical (unquoted) form against the tree.

use std::fmt;
use tmdl_core::{unquote, Document, Entity, EntityKind, TmdlError, TmdlResult};

/// Address of an entity: a table, or a descendant reached by child names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPath {
    pub table: String,
    pub children: Vec<String>,
}

impl EntityPath {
    /// Address a table.
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            children: Vec::new(),
        }
    }

    /// Address a direct child of a table.
    pub fn child(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            children: vec![name.into()],
        }
    }

    /// Address a nested descendant (e.g. a level inside a hierarchy).
    pub fn nested<I, S>(table: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            children: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)?;
        for child in &self.children {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}

pub(crate) fn find_table<'a>(doc: &'a Document, name: &str) -> TmdlResult<&'a Entity> {
    doc.table(name)
        .ok_or_else(|| TmdlError::not_found(format!("table '{}' not found", unquote(name))))
}

/// Resolve a path to its entity, read-only.
///
/// With a `kind`, only final-segment entities of that kind match; without
/// one, the first child entity of any kind with the given name matches.
/// Intermediate segments match any entity kind by name.
pub fn resolve<'a>(
    doc: &'a Document,
    path: &EntityPath,
    kind: Option<EntityKind>,
) -> TmdlResult<&'a Entity> {
    let mut current = find_table(doc, &path.table)?;
    for (i, segment) in path.children.iter().enumerate() {
        let wanted = unquote(segment);
        let last = i + 1 == path.children.len();
        let found = if last {
            match kind {
                Some(k) => current.child(k, segment),
                None => current.entities().find(|e| e.name.value == wanted),
            }
        } else {
            current.entities().find(|e| e.name.value == wanted)
        };
        current = found.ok_or_else(|| {
            TmdlError::not_found(format!("'{}' not found", wanted))
                .with_context(format!("in '{}'", current.name.value))
        })?;
    }
    Ok(current)
}

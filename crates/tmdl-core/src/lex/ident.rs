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

//! Identifier quoting rules.
//!
//! A name is single-quoted in emitted text iff [`needs_quoting`] says so.
//! Quoting is a pure function of the name's characters; it is never stored
//! on an entity, so it cannot drift between edits.

/// Keywords that force quoting when used verbatim as a name.
const RESERVED_KEYWORDS: &[&str] = &[
    "model",
    "table",
    "column",
    "measure",
    "partition",
    "relationship",
    "hierarchy",
    "level",
    "annotation",
    "variation",
    "calculationGroup",
    "calculationItem",
    "cultureInfo",
    "database",
    "ref",
];

/// Symbols that force quoting when they appear anywhere in a name.
const RESERVED_SYMBOLS: &str = ".-+*/()[]{}<>=,;@#$%^&\"'";

/// Whether a logical name must be single-quoted in emitted text.
pub fn needs_quoting(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return true;
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || RESERVED_SYMBOLS.contains(c))
    {
        return true;
    }
    RESERVED_KEYWORDS
        .iter()
        .any(|kw| name.eq_ignore_ascii_case(kw))
}

/// Quote a logical name for emission if its characters require it.
pub fn quote(name: &str) -> String {
    if needs_quoting(name) {
        format!("'{}'", name)
    } else {
        name.to_string()
    }
}

/// Strip one layer of single or double quotes, if present.
pub fn unquote(name: &str) -> &str {
    let n = name.trim();
    if n.len() >= 2
        && ((n.starts_with('\'') && n.ends_with('\'')) || (n.starts_with('"') && n.ends_with('"')))
    {
        &n[1..n.len() - 1]
    } else {
        n
    }
}

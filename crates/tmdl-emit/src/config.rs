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

//! Emission configuration.

use tmdl_core::{IndentUnit, Newline};

/// Configuration for TMDL emission.
///
/// By default the writer follows the conventions detected at parse time
/// (indent unit, newline style, trailing newline). Overrides only affect
/// rendered nodes and joins; untouched raw spans are emitted verbatim, so
/// overriding the indent unit on a parsed document will not re-indent
/// existing content. Overrides are primarily for documents built from
/// scratch.
#[derive(Debug, Clone, Default)]
pub struct EmitConfig {
    /// Override the indentation unit for rendered nodes.
    pub indent: Option<IndentUnit>,
    /// Override the newline style.
    pub newline: Option<Newline>,
    /// Override whether the output ends with a newline.
    pub trailing_newline: Option<bool>,
}

impl EmitConfig {
    /// Create a config that follows the document's own conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the indentation unit.
    pub fn with_indent(mut self, indent: IndentUnit) -> Self {
        self.indent = Some(indent);
        self
    }

    /// Override the newline style.
    pub fn with_newline(mut self, newline: Newline) -> Self {
        self.newline = Some(newline);
        self
    }

    /// Override the trailing-newline behavior.
    pub fn with_trailing_newline(mut self, trailing: bool) -> Self {
        self.trailing_newline = Some(trailing);
        self
    }
}

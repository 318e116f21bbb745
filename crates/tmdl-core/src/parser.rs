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

//! Main parser entry points: segment → tree → map.
//!
//! Parsing is a pure, synchronous computation over an in-memory buffer. The
//! returned [`Document`] retains raw spans for every node, so serializing an
//! unmodified document reproduces the input byte for byte.

use crate::document::Document;
use crate::error::TmdlResult;
use crate::lex::segment::segment;
use crate::limits::Limits;
use crate::mapper::map_document;
use crate::tree::build;

/// Parse a TMDL document with default limits.
pub fn parse(text: &str) -> TmdlResult<Document> {
    parse_with_limits(text, &Limits::default())
}

/// Parse a TMDL document with explicit resource limits.
pub fn parse_with_limits(text: &str, limits: &Limits) -> TmdlResult<Document> {
    let segmented = segment(text, limits)?;
    let roots = build(segmented.segments)?;
    let nodes = map_document(roots)?;
    Ok(Document {
        nodes,
        newline: segmented.newline,
        indent: segmented.indent,
        trailing_newline: segmented.trailing_newline,
    })
}

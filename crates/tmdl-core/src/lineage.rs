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

//! Lineage tag generation.
//!
//! Lineage tags identify entities across edits for downstream change
//! tracking. Uniqueness comes from the v4 UUID space rather than a central
//! registry, so concurrent parses of different files need no coordination.
//! Tags are generated exactly once per newly added entity; existing tags
//! are never touched or regenerated.

use uuid::Uuid;

/// Generate a fresh lineage tag (hyphenated lowercase UUID v4).
pub fn new_lineage_tag() -> String {
    Uuid::new_v4().to_string()
}

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

//! Security limits for TMDL parsing.
//!
//! Limits bound the resources a single parse may consume. Violations are
//! reported as security errors rather than silently truncating input.

/// Resource limits enforced while segmenting input.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum input size in bytes (default: 64 MiB).
    pub max_file_size: usize,
    /// Maximum physical line length in bytes (default: 1 MiB).
    pub max_line_length: usize,
    /// Maximum indentation depth (default: 64).
    pub max_indent_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: 64 * 1024 * 1024,
            max_line_length: 1024 * 1024,
            max_indent_depth: 64,
        }
    }
}

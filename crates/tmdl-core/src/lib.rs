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

//! Core parser and data model for TMDL semantic-model files.
//!
//! This crate parses Tabular Model Definition Language text into an
//! addressable entity tree and back, with byte-identical round trips for
//! untouched content. The pipeline is:
//!
//! 1. [`lex`] — line segmentation: logical lines with indentation depth,
//!    multi-line expression bodies folded into their declarations.
//! 2. Tree building — a single pass turning depths into an ordered tree.
//! 3. Entity mapping — keyword classification into typed entities
//!    ([`Entity`], [`Property`], comments, blanks, opaque pass-through).
//!
//! Expression text (DAX, M) is carried opaquely and never interpreted.
//! Mutation and serialization live in the `tmdl-edit` and `tmdl-emit`
//! crates.

mod document;
mod error;
pub mod lex;
mod limits;
mod lineage;
mod mapper;
mod parser;
mod tree;
mod value;

pub use document::{
    Comment, Document, Entity, EntityKind, Name, Node, Opaque, Property, PropertyValue,
};
pub use error::{TmdlError, TmdlErrorKind, TmdlResult};
pub use lex::{needs_quoting, quote, unquote, IndentUnit, Newline};
pub use limits::Limits;
pub use lineage::new_lineage_tag;
pub use parser::{parse, parse_with_limits};
pub use value::{Cardinality, CrossFilteringBehavior, DataType, PartitionMode, SummarizeBy};

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

//! Mutation engine for TMDL documents.
//!
//! Operations are addressed by [`EntityPath`] (table name, optional child
//! name) and carry payloads with a fixed key schema ([`EntitySpec`],
//! [`PropertyChanges`]); unknown payload keys are rejected. Each operation
//! is all-or-nothing: it returns a new [`Document`](tmdl_core::Document) on
//! success and leaves the input untouched on failure.
//!
//! Where a new entity lands among its siblings is a convention inferred
//! from authoring tools, not a grammar rule, so it is carried as an
//! [`InsertPolicy`] value.

mod ops;
mod path;
mod policy;
mod spec;

pub use ops::{add, add_with_policy, delete, update};
pub use path::{resolve, EntityPath};
pub use policy::InsertPolicy;
pub use spec::{EntitySpec, PropertyChanges};

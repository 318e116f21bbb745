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

//! Error types for TMDL parsing and editing.

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred while parsing or editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmdlErrorKind {
    /// Malformed indentation (skipped level, mixed units, dedent past root).
    Indentation,
    /// Unrecognized keyword at the top level of a file.
    UnknownKeyword,
    /// An entity path did not resolve.
    NotFound,
    /// Add collided with an existing sibling of the same kind and name.
    DuplicateName,
    /// A payload key outside the recognized schema.
    UnsupportedProperty,
    /// Serializer self-check failed; re-parsed output diverged from the tree.
    Invariant,
    /// Parse limit exceeded.
    Security,
    /// I/O error (file operations at the tool boundary).
    IO,
}

impl fmt::Display for TmdlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indentation => write!(f, "IndentationError"),
            Self::UnknownKeyword => write!(f, "UnknownKeywordError"),
            Self::NotFound => write!(f, "NotFoundError"),
            Self::DuplicateName => write!(f, "DuplicateNameError"),
            Self::UnsupportedProperty => write!(f, "UnsupportedPropertyError"),
            Self::Invariant => write!(f, "InvariantError"),
            Self::Security => write!(f, "SecurityError"),
            Self::IO => write!(f, "IOError"),
        }
    }
}

/// An error that occurred during TMDL parsing or editing.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}: {message}")]
pub struct TmdlError {
    /// The kind of error.
    pub kind: TmdlErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based; 0 when no source line applies).
    pub line: usize,
    /// Column number (1-based, optional).
    pub column: Option<usize>,
    /// Additional context (e.g., "in table Fact").
    pub context: Option<String>,
}

impl TmdlError {
    /// Create a new error.
    pub fn new(kind: TmdlErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column: None,
            context: None,
        }
    }

    /// Add column information.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add context information.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    // Convenience constructors for each error kind
    pub fn indentation(message: impl Into<String>, line: usize) -> Self {
        Self::new(TmdlErrorKind::Indentation, message, line)
    }

    pub fn unknown_keyword(message: impl Into<String>, line: usize) -> Self {
        Self::new(TmdlErrorKind::UnknownKeyword, message, line)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(TmdlErrorKind::NotFound, message, 0)
    }

    pub fn duplicate_name(message: impl Into<String>) -> Self {
        Self::new(TmdlErrorKind::DuplicateName, message, 0)
    }

    pub fn unsupported_property(message: impl Into<String>) -> Self {
        Self::new(TmdlErrorKind::UnsupportedProperty, message, 0)
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(TmdlErrorKind::Invariant, message, 0)
    }

    pub fn security(message: impl Into<String>, line: usize) -> Self {
        Self::new(TmdlErrorKind::Security, message, line)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(TmdlErrorKind::IO, message, 0)
    }
}

/// Result type for TMDL operations.
pub type TmdlResult<T> = Result<T, TmdlError>;

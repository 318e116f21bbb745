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

//! Typed property values recognized in TMDL files.
//!
//! Each enumeration mirrors the literal spellings used in the format.
//! Values outside these sets are not an error at parse time; property text
//! is retained verbatim and these types are applied on access.

use std::fmt;

/// Column data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    String,
    Int64,
    Double,
    Decimal,
    Boolean,
    DateTime,
    Binary,
}

impl DataType {
    /// The literal spelling used in TMDL text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::DateTime => "dateTime",
            Self::Binary => "binary",
        }
    }

    /// Parse the TMDL spelling; `None` for anything outside the set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "int64" => Some(Self::Int64),
            "double" => Some(Self::Double),
            "decimal" => Some(Self::Decimal),
            "boolean" => Some(Self::Boolean),
            "dateTime" => Some(Self::DateTime),
            "binary" => Some(Self::Binary),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column summarization modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SummarizeBy {
    None,
    Sum,
    Count,
    Min,
    Max,
    Average,
    DistinctCount,
}

impl SummarizeBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sum => "sum",
            Self::Count => "count",
            Self::Min => "min",
            Self::Max => "max",
            Self::Average => "average",
            Self::DistinctCount => "distinctCount",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "sum" => Some(Self::Sum),
            "count" => Some(Self::Count),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "average" => Some(Self::Average),
            "distinctCount" => Some(Self::DistinctCount),
            _ => None,
        }
    }
}

impl fmt::Display for SummarizeBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partition storage modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PartitionMode {
    Import,
    DirectQuery,
    Dual,
    Calculated,
    M,
}

impl PartitionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::DirectQuery => "directQuery",
            Self::Dual => "dual",
            Self::Calculated => "calculated",
            Self::M => "m",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "import" => Some(Self::Import),
            "directQuery" => Some(Self::DirectQuery),
            "dual" => Some(Self::Dual),
            "calculated" => Some(Self::Calculated),
            "m" => Some(Self::M),
            _ => None,
        }
    }
}

impl fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cardinality {
    OneToMany,
    ManyToOne,
    OneToOne,
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToMany => "oneToMany",
            Self::ManyToOne => "manyToOne",
            Self::OneToOne => "oneToOne",
            Self::ManyToMany => "manyToMany",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "oneToMany" => Some(Self::OneToMany),
            "manyToOne" => Some(Self::ManyToOne),
            "oneToOne" => Some(Self::OneToOne),
            "manyToMany" => Some(Self::ManyToMany),
            _ => None,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship cross-filtering behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossFilteringBehavior {
    Automatic,
    OneDirection,
    BothDirections,
}

impl CrossFilteringBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::OneDirection => "oneDirection",
            Self::BothDirections => "bothDirections",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "automatic" => Some(Self::Automatic),
            "oneDirection" => Some(Self::OneDirection),
            "bothDirections" => Some(Self::BothDirections),
            _ => None,
        }
    }
}

impl fmt::Display for CrossFilteringBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== DataType tests ====================

    #[test]
    fn test_data_type_round_trip() {
        for dt in [
            DataType::String,
            DataType::Int64,
            DataType::Double,
            DataType::Decimal,
            DataType::Boolean,
            DataType::DateTime,
            DataType::Binary,
        ] {
            assert_eq!(DataType::parse(dt.as_str()), Some(dt));
        }
    }

    #[test]
    fn test_data_type_camel_case_spelling() {
        assert_eq!(DataType::DateTime.as_str(), "dateTime");
    }

    #[test]
    fn test_data_type_unknown() {
        assert_eq!(DataType::parse("varchar"), None);
        assert_eq!(DataType::parse("DateTime"), None);
        assert_eq!(DataType::parse(""), None);
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(format!("{}", DataType::Int64), "int64");
    }

    // ==================== SummarizeBy tests ====================

    #[test]
    fn test_summarize_by_round_trip() {
        for sb in [
            SummarizeBy::None,
            SummarizeBy::Sum,
            SummarizeBy::Count,
            SummarizeBy::Min,
            SummarizeBy::Max,
            SummarizeBy::Average,
            SummarizeBy::DistinctCount,
        ] {
            assert_eq!(SummarizeBy::parse(sb.as_str()), Some(sb));
        }
    }

    #[test]
    fn test_summarize_by_unknown() {
        assert_eq!(SummarizeBy::parse("total"), None);
    }

    // ==================== PartitionMode tests ====================

    #[test]
    fn test_partition_mode_round_trip() {
        for pm in [
            PartitionMode::Import,
            PartitionMode::DirectQuery,
            PartitionMode::Dual,
            PartitionMode::Calculated,
            PartitionMode::M,
        ] {
            assert_eq!(PartitionMode::parse(pm.as_str()), Some(pm));
        }
    }

    // ==================== Cardinality tests ====================

    #[test]
    fn test_cardinality_round_trip() {
        for c in [
            Cardinality::OneToMany,
            Cardinality::ManyToOne,
            Cardinality::OneToOne,
            Cardinality::ManyToMany,
        ] {
            assert_eq!(Cardinality::parse(c.as_str()), Some(c));
        }
    }

    // ==================== CrossFilteringBehavior tests ====================

    #[test]
    fn test_cross_filtering_round_trip() {
        for b in [
            CrossFilteringBehavior::Automatic,
            CrossFilteringBehavior::OneDirection,
            CrossFilteringBehavior::BothDirections,
        ] {
            assert_eq!(CrossFilteringBehavior::parse(b.as_str()), Some(b));
        }
    }
}

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

//! Mutation payloads: entity specs and property changes.
//!
//! Payloads carry a fixed key schema. Unrecognized keys are rejected with
//! an unsupported-property error rather than silently accepted, so a caller
//! typo never turns into a silently dropped edit.

use serde_json::Value as Json;
use tmdl_core::{DataType, EntityKind, SummarizeBy, TmdlError, TmdlResult};

/// Payload keys accepted when creating an entity.
const SPEC_KEYS: &[&str] = &[
    "name",
    "dataType",
    "expression",
    "formatString",
    "summarizeBy",
    "isHidden",
    "description",
];

/// Payload keys accepted when updating an entity (`name` is not among
/// them; renames are not an update).
const CHANGE_KEYS: &[&str] = &[
    "dataType",
    "expression",
    "formatString",
    "summarizeBy",
    "isHidden",
    "description",
];

/// Specification of a new entity to add.
#[derive(Debug, Clone)]
pub struct EntitySpec {
    pub kind: EntityKind,
    pub name: String,
    pub data_type: Option<DataType>,
    pub expression: Option<String>,
    pub format_string: Option<String>,
    pub summarize_by: Option<SummarizeBy>,
    pub is_hidden: bool,
    pub description: Option<String>,
}

impl EntitySpec {
    /// A new measure with the given expression.
    pub fn measure(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Measure,
            name: name.into(),
            data_type: None,
            expression: Some(expression.into()),
            format_string: None,
            summarize_by: None,
            is_hidden: false,
            description: None,
        }
    }

    /// A new data column of the given type.
    pub fn column(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            kind: EntityKind::Column,
            name: name.into(),
            data_type: Some(data_type),
            expression: None,
            format_string: None,
            summarize_by: None,
            is_hidden: false,
            description: None,
        }
    }

    /// A new calculated column with the given expression.
    pub fn calculated_column(
        name: impl Into<String>,
        data_type: DataType,
        expression: impl Into<String>,
    ) -> Self {
        let mut spec = Self::column(name, data_type);
        spec.expression = Some(expression.into());
        spec
    }

    pub fn with_format_string(mut self, format_string: impl Into<String>) -> Self {
        self.format_string = Some(format_string.into());
        self
    }

    pub fn with_summarize_by(mut self, summarize_by: SummarizeBy) -> Self {
        self.summarize_by = Some(summarize_by);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = hidden;
        self
    }

    /// Build a spec from a JSON payload, rejecting unknown keys.
    pub fn from_json(kind: EntityKind, payload: &Json) -> TmdlResult<Self> {
        let map = as_object(payload)?;
        reject_unknown_keys(map, SPEC_KEYS)?;
        let name = map
            .get("name")
            .and_then(Json::as_str)
            .ok_or_else(|| TmdlError::unsupported_property("payload requires a string 'name'"))?;
        Ok(Self {
            kind,
            name: name.to_string(),
            data_type: opt_data_type(map)?,
            expression: opt_string(map, "expression")?,
            format_string: opt_string(map, "formatString")?,
            summarize_by: opt_summarize_by(map)?,
            is_hidden: opt_bool(map, "isHidden")?.unwrap_or(false),
            description: opt_string(map, "description")?,
        })
    }

    /// Validate the spec before it is applied.
    pub fn validate(&self) -> TmdlResult<()> {
        if self.name.trim().is_empty() {
            return Err(TmdlError::unsupported_property("name must not be empty"));
        }
        match self.kind {
            EntityKind::Column | EntityKind::Measure => {}
            other => {
                return Err(TmdlError::unsupported_property(format!(
                    "adding {} entities is not supported",
                    other.keyword()
                )))
            }
        }
        if self.kind == EntityKind::Measure && self.expression.is_none() {
            return Err(TmdlError::unsupported_property(
                "a measure requires an expression",
            ));
        }
        Ok(())
    }
}

/// A set of property changes to apply to an existing entity.
///
/// Unset fields are untouched. `is_hidden: Some(false)` removes the flag
/// line; `description: Some("")` removes the description comments.
#[derive(Debug, Clone, Default)]
pub struct PropertyChanges {
    pub data_type: Option<DataType>,
    pub expression: Option<String>,
    pub format_string: Option<String>,
    pub summarize_by: Option<SummarizeBy>,
    pub is_hidden: Option<bool>,
    pub description: Option<String>,
}

impl PropertyChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn format_string(mut self, format_string: impl Into<String>) -> Self {
        self.format_string = Some(format_string.into());
        self
    }

    pub fn summarize_by(mut self, summarize_by: SummarizeBy) -> Self {
        self.summarize_by = Some(summarize_by);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = Some(hidden);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the change set is empty.
    pub fn is_empty(&self) -> bool {
        self.data_type.is_none()
            && self.expression.is_none()
            && self.format_string.is_none()
            && self.summarize_by.is_none()
            && self.is_hidden.is_none()
            && self.description.is_none()
    }

    /// Build a change set from a JSON payload, rejecting unknown keys.
    pub fn from_json(payload: &Json) -> TmdlResult<Self> {
        let map = as_object(payload)?;
        reject_unknown_keys(map, CHANGE_KEYS)?;
        Ok(Self {
            data_type: opt_data_type(map)?,
            expression: opt_string(map, "expression")?,
            format_string: opt_string(map, "formatString")?,
            summarize_by: opt_summarize_by(map)?,
            is_hidden: opt_bool(map, "isHidden")?,
            description: opt_string(map, "description")?,
        })
    }
}

type JsonMap = serde_json::Map<String, Json>;

fn as_object(payload: &Json) -> TmdlResult<&JsonMap> {
    payload
        .as_object()
        .ok_or_else(|| TmdlError::unsupported_property("payload must be a JSON object"))
}

fn reject_unknown_keys(map: &JsonMap, allowed: &[&str]) -> TmdlResult<()> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(TmdlError::unsupported_property(format!(
                "unsupported payload key '{}'",
                key
            )));
        }
    }
    Ok(())
}

fn opt_string(map: &JsonMap, key: &str) -> TmdlResult<Option<String>> {
    match map.get(key) {
        None => Ok(None),
        Some(v) => v.as_str().map(|s| Some(s.to_string())).ok_or_else(|| {
            TmdlError::unsupported_property(format!("payload key '{}' must be a string", key))
        }),
    }
}

fn opt_bool(map: &JsonMap, key: &str) -> TmdlResult<Option<bool>> {
    match map.get(key) {
        None => Ok(None),
        Some(v) => v.as_bool().map(Some).ok_or_else(|| {
            TmdlError::unsupported_property(format!("payload key '{}' must be a boolean", key))
        }),
    }
}

fn opt_data_type(map: &JsonMap) -> TmdlResult<Option<DataType>> {
    match opt_string(map, "dataType")? {
        None => Ok(None),
        Some(s) => DataType::parse(&s).map(Some).ok_or_else(|| {
            TmdlError::unsupported_property(format!("unknown dataType '{}'", s))
        }),
    }
}

fn opt_summarize_by(map: &JsonMap) -> TmdlResult<Option<SummarizeBy>> {
    match opt_string(map, "summarizeBy")? {
        None => Ok(None),
        Some(s) => SummarizeBy::parse(&s).map(Some).ok_or_else(|| {
            TmdlError::unsupported_property(format!("unknown summarizeBy '{}'", s))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== EntitySpec ====================

    #[test]
    fn test_measure_spec() {
        let spec = EntitySpec::measure("Total Revenue", "SUM(Fact[Revenue])")
            .with_format_string("#,0")
            .with_description("Revenue across all products");
        assert!(spec.validate().is_ok());
        assert_eq!(spec.kind, EntityKind::Measure);
        assert_eq!(spec.format_string.as_deref(), Some("#,0"));
    }

    #[test]
    fn test_measure_requires_expression() {
        let mut spec = EntitySpec::measure("Total", "1");
        spec.expression = None;
        let err = spec.validate().unwrap_err();
        assert_eq!(err.kind, tmdl_core::TmdlErrorKind::UnsupportedProperty);
    }

    #[test]
    fn test_empty_name_rejected() {
        let spec = EntitySpec::measure("  ", "1");
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_unsupported_kind_rejected() {
        let mut spec = EntitySpec::measure("X", "1");
        spec.kind = EntityKind::Partition;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_spec_from_json() {
        let payload = json!({
            "name": "Total Revenue",
            "expression": "SUM(Fact[Revenue])",
            "formatString": "#,0",
            "isHidden": false
        });
        let spec = EntitySpec::from_json(EntityKind::Measure, &payload).unwrap();
        assert_eq!(spec.name, "Total Revenue");
        assert_eq!(spec.expression.as_deref(), Some("SUM(Fact[Revenue])"));
        assert!(!spec.is_hidden);
    }

    #[test]
    fn test_spec_from_json_rejects_unknown_key() {
        let payload = json!({ "name": "X", "expression": "1", "displayFolder": "KPIs" });
        let err = EntitySpec::from_json(EntityKind::Measure, &payload).unwrap_err();
        assert_eq!(err.kind, tmdl_core::TmdlErrorKind::UnsupportedProperty);
        assert!(err.message.contains("displayFolder"));
    }

    #[test]
    fn test_spec_from_json_requires_name() {
        let payload = json!({ "expression": "1" });
        assert!(EntitySpec::from_json(EntityKind::Measure, &payload).is_err());
    }

    #[test]
    fn test_spec_from_json_rejects_bad_enum() {
        let payload = json!({ "name": "C", "dataType": "varchar" });
        let err = EntitySpec::from_json(EntityKind::Column, &payload).unwrap_err();
        assert!(err.message.contains("varchar"));
    }

    #[test]
    fn test_spec_from_json_rejects_non_object() {
        assert!(EntitySpec::from_json(EntityKind::Measure, &json!("nope")).is_err());
    }

    // ==================== PropertyChanges ====================

    #[test]
    fn test_changes_builder() {
        let changes = PropertyChanges::new()
            .expression("SUM(Fact[Revenue]) * 2")
            .format_string("0.0%");
        assert!(!changes.is_empty());
        assert_eq!(changes.format_string.as_deref(), Some("0.0%"));
    }

    #[test]
    fn test_changes_empty() {
        assert!(PropertyChanges::new().is_empty());
    }

    #[test]
    fn test_changes_from_json() {
        let payload = json!({ "summarizeBy": "sum", "isHidden": true });
        let changes = PropertyChanges::from_json(&payload).unwrap();
        assert_eq!(changes.summarize_by, Some(SummarizeBy::Sum));
        assert_eq!(changes.is_hidden, Some(true));
    }

    #[test]
    fn test_changes_from_json_rejects_name() {
        let payload = json!({ "name": "Renamed" });
        let err = PropertyChanges::from_json(&payload).unwrap_err();
        assert_eq!(err.kind, tmdl_core::TmdlErrorKind::UnsupportedProperty);
    }

    #[test]
    fn test_changes_from_json_type_mismatch() {
        let payload = json!({ "isHidden": "yes" });
        assert!(PropertyChanges::from_json(&payload).is_err());
    }
}

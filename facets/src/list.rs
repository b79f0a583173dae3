//! FILENAME: facets/src/list.rs
//! PURPOSE: The list facet: rows whose expression value is one of a set
//! of chosen values.

use crate::error::{FacetError, FacetResult};
use crate::expression::{base_column, evaluate_row, expression_dependencies, rename_column, rename_expression};
use expr::{parse, ColumnSet, Expression};
use model::{EvalResult, Project, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A chosen value and its display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoratedValue {
    pub v: serde_json::Value,
    #[serde(default)]
    pub l: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub v: DecoratedValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListFacetConfig {
    pub name: String,
    pub expression: Option<String>,
    pub column_name: Option<String>,
    pub invert: bool,
    pub omit_blank: bool,
    pub omit_error: bool,
    pub selection: Vec<SelectionEntry>,
    pub select_blank: bool,
    pub select_error: bool,
}

impl ListFacetConfig {
    pub fn validate(&self) -> FacetResult<()> {
        let source = self
            .expression
            .as_deref()
            .ok_or_else(|| FacetError::Invalid("list facet requires an expression".to_string()))?;
        parse(source)?;
        Ok(())
    }

    pub fn column_dependencies(&self) -> Option<ColumnSet> {
        let source = self.expression.as_deref()?;
        expression_dependencies(source, base_column(&self.column_name))
    }

    pub fn rename_column_dependencies(&self, substitutions: &HashMap<String, String>) -> Self {
        ListFacetConfig {
            expression: self
                .expression
                .as_deref()
                .map(|source| rename_expression(source, substitutions)),
            column_name: rename_column(&self.column_name, substitutions),
            ..self.clone()
        }
    }

    pub(crate) fn bind(&self) -> FacetResult<ListMatcher> {
        self.validate()?;
        let expr = parse(self.expression.as_deref().unwrap_or_default())?;
        let selected = self
            .selection
            .iter()
            .map(|entry| EvalResult::from_json(&entry.v.v).to_value().to_string())
            .collect();
        Ok(ListMatcher { expr, selected })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ListMatcher {
    expr: Expression,
    /// Textual forms of the chosen values.
    selected: Vec<String>,
}

impl ListMatcher {
    pub(crate) fn row_matches(&self, config: &ListFacetConfig, project: &Project, row_index: usize) -> bool {
        // Nothing chosen: the facet does not filter.
        if self.selected.is_empty() && !config.select_blank && !config.select_error {
            return true;
        }

        let values = evaluate_row(project, row_index, base_column(&config.column_name), &self.expr);
        let hit = if values.is_empty() {
            config.select_blank
        } else {
            values.iter().any(|value| self.value_matches(config, value))
        };
        hit != config.invert
    }

    fn value_matches(&self, config: &ListFacetConfig, value: &Value) -> bool {
        if value.is_error() {
            config.select_error
        } else if value.is_blank() {
            config.select_blank
        } else {
            let text = value.to_string();
            self.selected.iter().any(|s| *s == text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> ListFacetConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reads_selection_records() {
        let c = config(
            r#"{"name":"City","expression":"value","columnName":"City",
                "selection":[{"v":{"v":"Paris","l":"Paris"}},{"v":{"v":3,"l":"3"}}],
                "selectBlank":true}"#,
        );
        assert_eq!(c.selection.len(), 2);
        assert_eq!(c.selection[1].v.v, serde_json::json!(3));
        assert!(c.select_blank);
        assert!(!c.invert);
    }

    #[test]
    fn missing_expression_fails_validation_only() {
        let c = config(r#"{"columnName":"City"}"#);
        assert!(matches!(c.validate(), Err(FacetError::Invalid(_))));
        assert_eq!(c.column_dependencies(), None);
    }

    #[test]
    fn dependencies_use_column_as_base() {
        let c = config(r#"{"expression":"value","columnName":"City"}"#);
        assert_eq!(c.column_dependencies(), Some(ColumnSet::from(["City".to_string()])));

        let c = config(r#"{"expression":"cells.Country.value","columnName":""}"#);
        assert_eq!(c.column_dependencies(), Some(ColumnSet::from(["Country".to_string()])));
    }

    #[test]
    fn rename_updates_column_and_expression() {
        let c = config(r#"{"expression":"cells.Town.value","columnName":"Town"}"#);
        let map = HashMap::from([("Town".to_string(), "City".to_string())]);
        let renamed = c.rename_column_dependencies(&map);
        assert_eq!(renamed.column_name.as_deref(), Some("City"));
        assert_eq!(renamed.expression.as_deref(), Some("cells.City.value"));
    }
}

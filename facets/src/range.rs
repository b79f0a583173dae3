//! FILENAME: facets/src/range.rs
//! PURPOSE: Numeric range and time range facets.
//! CONTEXT: Both select rows whose expression value falls inside
//! `[from, to)`, plus optional buckets for values of the wrong kind,
//! blanks and errors. Time bounds are epoch milliseconds.

use crate::error::{FacetError, FacetResult};
use crate::expression::{base_column, evaluate_row, expression_dependencies, rename_column, rename_expression};
use expr::{parse, ColumnSet, Expression};
use model::{Project, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFacetConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    #[serde(default = "yes")]
    pub select_numeric: bool,
    #[serde(default = "yes")]
    pub select_non_numeric: bool,
    #[serde(default = "yes")]
    pub select_blank: bool,
    #[serde(default = "yes")]
    pub select_error: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeFacetConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    #[serde(default = "yes")]
    pub select_time: bool,
    #[serde(default = "yes")]
    pub select_non_time: bool,
    #[serde(default = "yes")]
    pub select_blank: bool,
    #[serde(default = "yes")]
    pub select_error: bool,
}

fn check_bounds(kind: &str, from: Option<f64>, to: Option<f64>) -> FacetResult<()> {
    for bound in [from, to].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(FacetError::Invalid(format!("{} facet bounds must be finite", kind)));
        }
    }
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(FacetError::Invalid(format!(
                "{} facet has 'from' ({}) greater than 'to' ({})",
                kind, from, to
            )));
        }
    }
    Ok(())
}

fn require_expression<'c>(kind: &str, expression: &'c Option<String>) -> FacetResult<&'c str> {
    let source = expression
        .as_deref()
        .ok_or_else(|| FacetError::Invalid(format!("{} facet requires an expression", kind)))?;
    parse(source)?;
    Ok(source)
}

fn in_bounds(n: f64, from: Option<f64>, to: Option<f64>) -> bool {
    from.map_or(true, |from| n >= from) && to.map_or(true, |to| n < to)
}

impl RangeFacetConfig {
    pub fn validate(&self) -> FacetResult<()> {
        require_expression("range", &self.expression)?;
        check_bounds("range", self.from, self.to)
    }

    pub fn column_dependencies(&self) -> Option<ColumnSet> {
        expression_dependencies(self.expression.as_deref()?, base_column(&self.column_name))
    }

    pub fn rename_column_dependencies(&self, substitutions: &HashMap<String, String>) -> Self {
        RangeFacetConfig {
            expression: self.expression.as_deref().map(|s| rename_expression(s, substitutions)),
            column_name: rename_column(&self.column_name, substitutions),
            ..self.clone()
        }
    }

    pub(crate) fn bind(&self) -> FacetResult<Expression> {
        self.validate()?;
        Ok(parse(require_expression("range", &self.expression)?)?)
    }

    pub(crate) fn row_matches(&self, expr: &Expression, project: &Project, row_index: usize) -> bool {
        evaluate_row(project, row_index, base_column(&self.column_name), expr)
            .iter()
            .any(|value| self.value_matches(value))
    }

    fn value_matches(&self, value: &Value) -> bool {
        if value.is_error() {
            return self.select_error;
        }
        if value.is_blank() {
            return self.select_blank;
        }
        match value.as_f64() {
            Some(n) if n.is_finite() => self.select_numeric && in_bounds(n, self.from, self.to),
            _ => self.select_non_numeric,
        }
    }
}

impl TimeRangeFacetConfig {
    pub fn validate(&self) -> FacetResult<()> {
        require_expression("timerange", &self.expression)?;
        check_bounds("timerange", self.from, self.to)
    }

    pub fn column_dependencies(&self) -> Option<ColumnSet> {
        expression_dependencies(self.expression.as_deref()?, base_column(&self.column_name))
    }

    pub fn rename_column_dependencies(&self, substitutions: &HashMap<String, String>) -> Self {
        TimeRangeFacetConfig {
            expression: self.expression.as_deref().map(|s| rename_expression(s, substitutions)),
            column_name: rename_column(&self.column_name, substitutions),
            ..self.clone()
        }
    }

    pub(crate) fn bind(&self) -> FacetResult<Expression> {
        self.validate()?;
        Ok(parse(require_expression("timerange", &self.expression)?)?)
    }

    pub(crate) fn row_matches(&self, expr: &Expression, project: &Project, row_index: usize) -> bool {
        evaluate_row(project, row_index, base_column(&self.column_name), expr)
            .iter()
            .any(|value| self.value_matches(value))
    }

    fn value_matches(&self, value: &Value) -> bool {
        match value {
            Value::Error(_) => self.select_error,
            Value::Timestamp(ts) => {
                self.select_time && in_bounds(ts.timestamp_millis() as f64, self.from, self.to)
            }
            v if v.is_blank() => self.select_blank,
            _ => self.select_non_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_flags_default_to_true() {
        let c: RangeFacetConfig =
            serde_json::from_str(r#"{"expression":"value","columnName":"Age"}"#).unwrap();
        assert!(c.select_numeric && c.select_non_numeric && c.select_blank && c.select_error);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn contradictory_bounds_are_rejected() {
        let c: RangeFacetConfig =
            serde_json::from_str(r#"{"expression":"value","from":10,"to":2}"#).unwrap();
        assert!(matches!(c.validate(), Err(FacetError::Invalid(_))));

        let c: TimeRangeFacetConfig =
            serde_json::from_str(r#"{"expression":"value","from":5,"to":5}"#).unwrap();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn numeric_bounds_are_half_open() {
        let c: RangeFacetConfig = serde_json::from_str(
            r#"{"expression":"value","from":1,"to":3,"selectNonNumeric":false}"#,
        )
        .unwrap();
        assert!(c.value_matches(&Value::Integer(1)));
        assert!(c.value_matches(&Value::Float(2.5)));
        assert!(!c.value_matches(&Value::Integer(3)));
        assert!(!c.value_matches(&Value::from("two")));
        assert!(c.value_matches(&Value::Null));
        assert!(c.value_matches(&Value::error("bad")));
    }

    #[test]
    fn time_values_compare_in_epoch_millis() {
        let ts = chrono_ts("2024-01-01T00:00:00Z");
        let millis = 1_704_067_200_000.0;
        let c: TimeRangeFacetConfig = serde_json::from_str(&format!(
            r#"{{"expression":"value","from":{},"to":{},"selectNonTime":false}}"#,
            millis,
            millis + 1.0
        ))
        .unwrap();
        assert!(c.value_matches(&ts));
        assert!(!c.value_matches(&Value::Integer(5)));
    }

    fn chrono_ts(text: &str) -> Value {
        let cell = model::Cell::load(&format!(r#"{{"v":"{}","t":"date"}}"#, text), &model::Pool::new()).unwrap();
        cell.value
    }
}

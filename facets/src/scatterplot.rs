//! FILENAME: facets/src/scatterplot.rs
//! PURPOSE: Two-dimensional numeric selection over a pair of expressions.
//! CONTEXT: A row matches when both of its coordinates are numbers that
//! fall inside the selected rectangle. Bounds are in data space after the
//! axis transform (`log` takes the base-10 logarithm).

use crate::error::{FacetError, FacetResult};
use crate::expression::{base_column, evaluate_row, expression_dependencies, rename_column, rename_expression};
use expr::{parse, ColumnSet, Expression};
use model::Project;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    Lin,
    Log,
}

impl AxisScale {
    fn apply(self, n: f64) -> Option<f64> {
        match self {
            AxisScale::Lin => Some(n),
            AxisScale::Log if n > 0.0 => Some(n.log10()),
            AxisScale::Log => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterplotFacetConfig {
    pub name: String,
    pub x_expr: Option<String>,
    #[serde(rename = "x_columnName")]
    pub x_column_name: Option<String>,
    pub y_expr: Option<String>,
    #[serde(rename = "y_columnName")]
    pub y_column_name: Option<String>,
    pub from_x: Option<f64>,
    pub to_x: Option<f64>,
    pub from_y: Option<f64>,
    pub to_y: Option<f64>,
    pub dim_x: AxisScale,
    pub dim_y: AxisScale,
}

fn required<'c>(field: &str, source: &'c Option<String>) -> FacetResult<&'c str> {
    source
        .as_deref()
        .ok_or_else(|| FacetError::Invalid(format!("scatterplot facet requires {}", field)))
}

fn ordered(axis: &str, from: Option<f64>, to: Option<f64>) -> FacetResult<()> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(FacetError::Invalid(format!(
            "scatterplot facet has from_{0} greater than to_{0}",
            axis
        ))),
        _ => Ok(()),
    }
}

impl ScatterplotFacetConfig {
    pub fn validate(&self) -> FacetResult<()> {
        parse(required("x_expr", &self.x_expr)?)?;
        parse(required("y_expr", &self.y_expr)?)?;
        ordered("x", self.from_x, self.to_x)?;
        ordered("y", self.from_y, self.to_y)
    }

    pub fn column_dependencies(&self) -> Option<ColumnSet> {
        let mut columns =
            expression_dependencies(self.x_expr.as_deref()?, base_column(&self.x_column_name))?;
        columns.extend(expression_dependencies(
            self.y_expr.as_deref()?,
            base_column(&self.y_column_name),
        )?);
        Some(columns)
    }

    pub fn rename_column_dependencies(&self, substitutions: &HashMap<String, String>) -> Self {
        ScatterplotFacetConfig {
            x_expr: self.x_expr.as_deref().map(|s| rename_expression(s, substitutions)),
            x_column_name: rename_column(&self.x_column_name, substitutions),
            y_expr: self.y_expr.as_deref().map(|s| rename_expression(s, substitutions)),
            y_column_name: rename_column(&self.y_column_name, substitutions),
            ..self.clone()
        }
    }

    pub(crate) fn bind(&self) -> FacetResult<(Expression, Expression)> {
        self.validate()?;
        let x = parse(required("x_expr", &self.x_expr)?)?;
        let y = parse(required("y_expr", &self.y_expr)?)?;
        Ok((x, y))
    }

    pub(crate) fn row_matches(
        &self,
        x: &Expression,
        y: &Expression,
        project: &Project,
        row_index: usize,
    ) -> bool {
        let coordinate = |expr: &Expression, column: &Option<String>, scale: AxisScale| {
            evaluate_row(project, row_index, base_column(column), expr)
                .first()
                .and_then(|value| value.as_f64())
                .filter(|n| n.is_finite())
                .and_then(|n| scale.apply(n))
        };
        let x = coordinate(x, &self.x_column_name, self.dim_x);
        let y = coordinate(y, &self.y_column_name, self.dim_y);

        match (x, y) {
            (Some(x), Some(y)) => {
                within(x, self.from_x, self.to_x) && within(y, self.from_y, self.to_y)
            }
            _ => false,
        }
    }
}

fn within(n: f64, from: Option<f64>, to: Option<f64>) -> bool {
    from.map_or(true, |from| n >= from) && to.map_or(true, |to| n <= to)
}

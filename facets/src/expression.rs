//! FILENAME: facets/src/expression.rs
//! PURPOSE: Helpers shared by the expression-bearing facet variants.
//! CONTEXT: Facets store their expressions as source text so that a
//! malformed configuration still round-trips. Parsing happens on demand.

use expr::{parse, Bindings, ColumnSet, Expression};
use model::{Project, Value};
use std::collections::HashMap;

/// A configured column name, with "" meaning "no base column".
pub(crate) fn base_column(column_name: &Option<String>) -> Option<&str> {
    column_name.as_deref().filter(|name| !name.is_empty())
}

/// Dependencies of an expression given as text. Text that does not
/// parse could read anything.
pub(crate) fn expression_dependencies(source: &str, base_column: Option<&str>) -> Option<ColumnSet> {
    match parse(source) {
        Ok(expr) => expr.column_dependencies(base_column),
        Err(e) => {
            log::warn!("facet expression {:?} does not parse: {}", source, e);
            None
        }
    }
}

/// Renames the column references inside an expression given as text.
/// Text that does not parse is returned unchanged.
pub(crate) fn rename_expression(source: &str, substitutions: &HashMap<String, String>) -> String {
    match parse(source) {
        Ok(expr) => expr.rename_column_dependencies(substitutions).to_string(),
        Err(_) => source.to_string(),
    }
}

pub(crate) fn rename_column(
    column_name: &Option<String>,
    substitutions: &HashMap<String, String>,
) -> Option<String> {
    column_name
        .as_ref()
        .map(|name| substitutions.get(name).unwrap_or(name).clone())
}

/// Evaluates `expr` against one row and collapses the result to a
/// value. List results are returned element-wise.
pub(crate) fn evaluate_row(
    project: &Project,
    row_index: usize,
    base_column: Option<&str>,
    expr: &Expression,
) -> Vec<Value> {
    let bindings = match Bindings::for_row(project, row_index, base_column) {
        Some(bindings) => bindings,
        None => return Vec::new(),
    };
    match expr.evaluate(&bindings) {
        model::EvalResult::List(items) => items.iter().map(|item| item.to_value()).collect(),
        other => vec![other.to_value()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_expressions_are_unknown_and_kept_verbatim() {
        assert_eq!(expression_dependencies("cells.", None), None);
        let map = HashMap::from([("A".to_string(), "B".to_string())]);
        assert_eq!(rename_expression("cells.(", &map), "cells.(");
        assert_eq!(rename_expression("cells.A.value", &map), "cells.B.value");
    }

    #[test]
    fn renaming_keeps_unrelated_literals() {
        let map = HashMap::from([("A".to_string(), "B".to_string())]);
        let renamed = rename_expression("coalesce(cells.A.value, 1.0, \"a\u{1}b\")", &map);
        assert_eq!(
            parse(&renamed).unwrap(),
            parse("coalesce(cells.B.value, 1.0, \"a\u{1}b\")").unwrap()
        );
    }

    #[test]
    fn empty_column_name_means_no_base_column() {
        assert_eq!(base_column(&Some(String::new())), None);
        assert_eq!(base_column(&Some("A".to_string())), Some("A"));
        assert_eq!(base_column(&None), None);
    }
}

//! FILENAME: expr/src/evaluator.rs
//! PURPOSE: Evaluates expression trees against a binding environment.
//! CONTEXT: After an expression is parsed into an AST, this module traverses
//! the tree and computes a result. Evaluation never fails as a Rust error:
//! data problems become error values that travel up the tree unchanged
//! until whoever consumes the result decides what to do with them.
//!
//! FIELD ACCESS, in order:
//! - error target: the error is returned as is
//! - null target: null
//! - field-bearing target (cell, recon, row, cells): its `get_field`, null if absent
//! - structured record (JSON object): the member, converted to a runtime value
//! - anything else: null ("no such field", not an error)

use crate::ast::Expression;
use crate::bindings::Bindings;
use crate::functions;
use model::EvalResult;

pub struct Evaluator<'b, 'a> {
    bindings: &'b Bindings<'a>,
}

impl<'b, 'a> Evaluator<'b, 'a> {
    pub fn new(bindings: &'b Bindings<'a>) -> Self {
        Evaluator { bindings }
    }

    /// Evaluates an expression and returns the result.
    pub fn evaluate(&self, expr: &Expression) -> EvalResult<'a> {
        match expr {
            Expression::Literal(value) => EvalResult::Value(value.clone()),

            // Unbound names read as null.
            Expression::Variable(name) => self
                .bindings
                .get(name)
                .cloned()
                .unwrap_or_else(EvalResult::null),

            Expression::FieldAccess { inner, field } => {
                let target = self.evaluate(inner);
                access_field(target, field)
            }

            Expression::FunctionCall { name, args } => {
                let evaluated: Vec<EvalResult<'a>> =
                    args.iter().map(|arg| self.evaluate(arg)).collect();
                functions::call(name, evaluated)
            }
        }
    }
}

/// Reads `field` from an already evaluated target.
pub(crate) fn access_field<'a>(target: EvalResult<'a>, field: &str) -> EvalResult<'a> {
    if target.is_error() || target.is_null() {
        return target;
    }

    if let Some(bearer) = target.as_field_bearing() {
        return bearer.get_field(field).unwrap_or_else(EvalResult::null);
    }

    match &target {
        EvalResult::Json(serde_json::Value::Object(members)) => members
            .get(field)
            .map(EvalResult::from_json)
            .unwrap_or_else(EvalResult::null),
        _ => EvalResult::null(),
    }
}

impl Expression {
    /// Evaluates this expression against `bindings`.
    pub fn evaluate<'a>(&self, bindings: &Bindings<'a>) -> EvalResult<'a> {
        Evaluator::new(bindings).evaluate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use model::{Cell, Project, Recon, ReconCandidate, Value};
    use std::sync::Arc;

    fn eval<'a>(text: &str, bindings: &Bindings<'a>) -> EvalResult<'a> {
        parse(text).unwrap().evaluate(bindings)
    }

    fn sample_project() -> Project {
        let mut project = Project::with_columns(1, &["Name", "First name", "City"]).unwrap();
        let recon = Recon::new(9, "svc").with_match(ReconCandidate::new("Q60", "New York City", 0.9));
        project.append_row(vec![
            Some(Cell::from_value("Alice")),
            Some(Cell::from_value("Al")),
            Some(Cell::new(Value::from("NYC"), Some(Arc::new(recon)))),
        ]);
        project
    }

    #[test]
    fn reads_cells_by_column_name() {
        let project = sample_project();
        let bindings = Bindings::for_row(&project, 0, Some("Name")).unwrap();

        assert_eq!(
            eval("cells.Name.value", &bindings),
            EvalResult::Value(Value::from("Alice"))
        );
        assert_eq!(
            eval("cells[\"First name\"].value", &bindings),
            EvalResult::Value(Value::from("Al"))
        );
        assert_eq!(
            eval("row.cells.City.recon.match.name", &bindings),
            EvalResult::Value(Value::from("New York City"))
        );
        assert_eq!(
            eval("row.index", &bindings),
            EvalResult::Value(Value::Integer(0))
        );
    }

    #[test]
    fn missing_fields_are_null_not_errors() {
        let project = sample_project();
        let bindings = Bindings::for_row(&project, 0, Some("Name")).unwrap();

        assert!(eval("cells.Nope", &bindings).is_null());
        assert!(eval("cells.Nope.value", &bindings).is_null());
        assert!(eval("cell.nonsense", &bindings).is_null());
        // Plain values carry no fields.
        assert!(eval("value.length", &bindings).is_null());
        assert!(eval("unbound.field", &bindings).is_null());
    }

    #[test]
    fn errors_propagate_unchanged_through_field_access() {
        let mut bindings = Bindings::new();
        bindings.bind("value", Value::error("bad conversion"));

        let result = eval("value.a.b.c", &bindings);
        assert_eq!(result, EvalResult::Value(Value::error("bad conversion")));
    }

    #[test]
    fn structured_records_expose_their_members() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": {"b": 3}, "list": [1, 2], "s": "x"}"#).unwrap();
        let mut bindings = Bindings::new();
        bindings.bind("doc", EvalResult::Json(json));

        assert_eq!(eval("doc.a.b", &bindings), EvalResult::Value(Value::Integer(3)));
        assert_eq!(eval("doc.s", &bindings), EvalResult::Value(Value::from("x")));
        assert!(matches!(eval("doc.list", &bindings), EvalResult::List(items) if items.len() == 2));
        assert!(eval("doc.missing", &bindings).is_null());
    }

    #[test]
    fn function_calls_compose_with_field_access() {
        let project = sample_project();
        let bindings = Bindings::for_row(&project, 0, Some("Name")).unwrap();

        assert_eq!(
            eval("cells.Name.value.toUppercase()", &bindings),
            EvalResult::Value(Value::from("ALICE"))
        );
        assert_eq!(
            eval("length(value)", &bindings),
            EvalResult::Value(Value::Integer(5))
        );
    }
}

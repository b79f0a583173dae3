//! FILENAME: expr/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for expressions.
//! CONTEXT: After the Lexer tokenizes an expression string, the Parser
//! converts those tokens into this tree structure. The Evaluator then
//! traverses the tree to compute a result, and the dependency analysis
//! walks it without evaluating anything.
//!
//! Trees are immutable once built. Renaming produces a new tree.
//! Equality and hashing are structural, so two independently parsed
//! copies of the same text are interchangeable as cache keys.
//!
//! SUPPORTED EXPRESSIONS:
//! - Literals: numbers, strings, booleans, null
//! - Variables: value, cell, cells, row, rowIndex, columnName, ...
//! - Field access: cells.Name, cells["First name"], cell.recon.match
//! - Function calls: toUppercase(value), value.trim()

use crate::lexer::is_identifier;
use model::Value;
use std::fmt;

/// Textual forms of "the current row's cells".
pub const CELLS_ROOTS: [&str; 2] = ["cells", "row.cells"];

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Expression {
    /// A literal value.
    Literal(Value),

    /// A name looked up in the binding environment.
    Variable(String),

    /// Reads the named field of whatever `inner` evaluates to.
    FieldAccess {
        inner: Box<Expression>,
        field: String,
    },

    /// A call to a builtin function. Method-call syntax `x.f(a)` is
    /// stored as `f(x, a)`.
    FunctionCall { name: String, args: Vec<Expression> },
}

impl Expression {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn field(inner: Expression, field: impl Into<String>) -> Self {
        Expression::FieldAccess {
            inner: Box::new(inner),
            field: field.into(),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// True when this node's textual form is one of [`CELLS_ROOTS`].
    pub fn is_cells_root(&self) -> bool {
        match self {
            Expression::Variable(_) | Expression::FieldAccess { .. } => {
                CELLS_ROOTS.contains(&self.to_string().as_str())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => fmt_literal(value, f),
            Expression::Variable(name) => f.write_str(name),
            Expression::FieldAccess { inner, field } => {
                if is_identifier(field) {
                    write!(f, "{}.{}", inner, field)
                } else {
                    write!(f, "{}[{}]", inner, quote(field))
                }
            }
            Expression::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

fn fmt_literal(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        // A float keeps its '.' so it lexes back as a float.
        Value::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{}.0", n),
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) => write!(f, "{}", value),
        other => f.write_str(&quote(&other.to_string())),
    }
}

/// Double-quotes `text` using only the escapes the lexer reads back.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

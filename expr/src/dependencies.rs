//! FILENAME: expr/src/dependencies.rs
//! PURPOSE: Static column analysis of expression trees.
//! CONTEXT: Operations and facets ask which columns an expression reads
//! so they can be reordered, skipped or rewritten when columns are
//! renamed. Nothing here evaluates anything.
//!
//! `None` means "cannot tell, assume every column"; `Some(empty)` means
//! "reads no column". Callers must branch on the option, never on
//! emptiness.

use crate::ast::Expression;
use rustc_hash::FxHashMap;
use std::collections::{BTreeSet, HashMap};

pub type ColumnSet = BTreeSet<String>;

impl Expression {
    /// Column names this expression reads when evaluated with
    /// `base_column` as the current column.
    pub fn column_dependencies(&self, base_column: Option<&str>) -> Option<ColumnSet> {
        match self {
            Expression::Literal(_) => Some(ColumnSet::new()),

            Expression::Variable(name) => match name.as_str() {
                "value" | "cell" | "recon" => {
                    base_column.map(|column| ColumnSet::from([column.to_string()]))
                }
                "row" | "cells" | "record" => None,
                _ => Some(ColumnSet::new()),
            },

            Expression::FieldAccess { inner, field } => match inner.column_dependencies(base_column) {
                Some(columns) => Some(columns),
                None if inner.is_cells_root() => Some(ColumnSet::from([field.clone()])),
                None => None,
            },

            Expression::FunctionCall { args, .. } => {
                let mut columns = ColumnSet::new();
                for arg in args {
                    columns.extend(arg.column_dependencies(base_column)?);
                }
                Some(columns)
            }
        }
    }

    /// A new tree with every column reference renamed per `substitutions`.
    /// Names missing from the map are kept.
    pub fn rename_column_dependencies(&self, substitutions: &HashMap<String, String>) -> Expression {
        match self {
            Expression::FieldAccess { inner, field } => {
                if inner.is_cells_root() {
                    let renamed = substitutions.get(field).unwrap_or(field);
                    Expression::field((**inner).clone(), renamed.clone())
                } else {
                    Expression::field(inner.rename_column_dependencies(substitutions), field.clone())
                }
            }
            Expression::FunctionCall { name, args } => Expression::call(
                name.clone(),
                args.iter()
                    .map(|arg| arg.rename_column_dependencies(substitutions))
                    .collect(),
            ),
            Expression::Literal(_) | Expression::Variable(_) => self.clone(),
        }
    }
}

/// Memoized [`Expression::column_dependencies`], keyed structurally.
#[derive(Debug, Default)]
pub struct DependencyCache {
    entries: FxHashMap<(Expression, Option<String>), Option<ColumnSet>>,
}

impl DependencyCache {
    pub fn new() -> Self {
        DependencyCache::default()
    }

    pub fn column_dependencies(
        &mut self,
        expr: &Expression,
        base_column: Option<&str>,
    ) -> Option<ColumnSet> {
        let key = (expr.clone(), base_column.map(str::to_string));
        if let Some(cached) = self.entries.get(&key) {
            return cached.clone();
        }
        let computed = expr.column_dependencies(base_column);
        log::debug!("dependencies of {} computed: {:?}", expr, computed);
        self.entries.insert(key, computed.clone());
        computed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

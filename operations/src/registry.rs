//! FILENAME: operations/src/registry.rs
//! PURPOSE: Maps operation tags to payload constructors.
//! CONTEXT: Mirrors the facet registry: the builtin table is checked for
//! duplicate tags when first used, unknown tags are typed errors.

use crate::column_removal::ColumnRemovalOperation;
use crate::column_rename::ColumnRenameOperation;
use crate::error::{OperationError, OperationResult};
use crate::key_value_columnize::KeyValueColumnizeOperation;
use crate::operation::Operation;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

pub type OperationConstructor = fn(serde_json::Value) -> Result<Operation, serde_json::Error>;

#[derive(Debug, Default)]
pub struct OperationRegistry {
    constructors: FxHashMap<&'static str, OperationConstructor>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        OperationRegistry::default()
    }

    pub fn register(&mut self, tag: &'static str, constructor: OperationConstructor) -> OperationResult<()> {
        if self.constructors.contains_key(tag) {
            return Err(OperationError::DuplicateOperation(tag.to_string()));
        }
        self.constructors.insert(tag, constructor);
        Ok(())
    }

    pub fn with_builtins() -> OperationResult<Self> {
        let mut registry = OperationRegistry::new();
        registry.register("core/key-value-columnize", |json| {
            serde_json::from_value::<KeyValueColumnizeOperation>(json).map(Operation::KeyValueColumnize)
        })?;
        registry.register("core/column-removal", |json| {
            serde_json::from_value::<ColumnRemovalOperation>(json).map(Operation::ColumnRemoval)
        })?;
        registry.register("core/column-rename", |json| {
            serde_json::from_value::<ColumnRenameOperation>(json).map(Operation::ColumnRename)
        })?;
        log::debug!("operation registry built with {} operations", registry.len());
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    pub fn construct(&self, json: serde_json::Value) -> OperationResult<Operation> {
        let tag = match json.get("op") {
            Some(serde_json::Value::String(tag)) => tag.clone(),
            _ => return Err(OperationError::MissingOperationType),
        };
        let constructor = self
            .constructors
            .get(tag.as_str())
            .ok_or(OperationError::UnknownOperation(tag))?;
        Ok(constructor(json)?)
    }
}

static BUILTIN: Lazy<Result<OperationRegistry, String>> =
    Lazy::new(|| OperationRegistry::with_builtins().map_err(|e| e.to_string()));

/// The process-wide builtin registry.
pub fn registry() -> OperationResult<&'static OperationRegistry> {
    BUILTIN
        .as_ref()
        .map_err(|message| OperationError::Registry(message.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("core/key-value-columnize"));
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut registry = OperationRegistry::new();
        let constructor: OperationConstructor = |json| {
            serde_json::from_value::<ColumnRemovalOperation>(json).map(Operation::ColumnRemoval)
        };
        registry.register("core/column-removal", constructor).unwrap();
        assert!(matches!(
            registry.register("core/column-removal", constructor),
            Err(OperationError::DuplicateOperation(_))
        ));
    }
}

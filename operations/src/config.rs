//! FILENAME: operations/src/config.rs
//! PURPOSE: Engine settings.
//! CONTEXT: Read from a JSON document in which every member is optional;
//! anything missing takes its default.

use serde::{Deserialize, Serialize};

/// Default bound on the undo log.
pub const MAX_HISTORY_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryConfig {
    /// Undoable entries kept before the oldest is evicted.
    pub max_entries: usize,
    /// Redoable entries kept before the oldest is evicted.
    pub max_redo_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            max_entries: MAX_HISTORY_SIZE,
            max_redo_entries: MAX_HISTORY_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub history: HistoryConfig,
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_members_take_defaults() {
        let config = EngineConfig::from_json_str(r#"{"history":{"maxEntries":5}}"#).unwrap();
        assert_eq!(config.history.max_entries, 5);
        assert_eq!(config.history.max_redo_entries, MAX_HISTORY_SIZE);
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(EngineConfig::from_json_str(r#"{"history":{"maxEntries":"lots"}}"#).is_err());
    }
}

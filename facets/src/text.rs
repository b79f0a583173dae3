//! FILENAME: facets/src/text.rs
//! PURPOSE: Text search facet over a single column.

use crate::error::{FacetError, FacetResult};
use crate::expression::{base_column, rename_column};
use expr::ColumnSet;
use model::Project;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSearchMode {
    #[default]
    Text,
    Regex,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextFacetConfig {
    pub name: String,
    pub column_name: Option<String>,
    pub query: Option<String>,
    pub mode: TextSearchMode,
    pub case_sensitive: bool,
    pub invert: bool,
}

impl TextFacetConfig {
    pub fn validate(&self) -> FacetResult<()> {
        match self.column_name.as_deref() {
            Some(name) if !name.is_empty() => {}
            _ => {
                return Err(FacetError::Invalid(
                    "text facet requires a columnName".to_string(),
                ))
            }
        }
        if self.mode == TextSearchMode::Regex {
            self.compile_regex()?;
        }
        Ok(())
    }

    pub fn column_dependencies(&self) -> Option<ColumnSet> {
        let name = base_column(&self.column_name)?;
        Some(ColumnSet::from([name.to_string()]))
    }

    pub fn rename_column_dependencies(&self, substitutions: &HashMap<String, String>) -> Self {
        TextFacetConfig {
            column_name: rename_column(&self.column_name, substitutions),
            ..self.clone()
        }
    }

    fn compile_regex(&self) -> FacetResult<Option<Regex>> {
        match self.query.as_deref() {
            Some(query) if !query.is_empty() => RegexBuilder::new(query)
                .case_insensitive(!self.case_sensitive)
                .build()
                .map(Some)
                .map_err(|e| FacetError::Invalid(format!("invalid regular expression: {}", e))),
            _ => Ok(None),
        }
    }

    pub(crate) fn bind(&self) -> FacetResult<TextMatcher> {
        self.validate()?;
        let matcher = match self.mode {
            TextSearchMode::Regex => match self.compile_regex()? {
                Some(regex) => TextMatcher::Regex(regex),
                None => TextMatcher::All,
            },
            TextSearchMode::Text => match self.query.as_deref() {
                Some(query) if !query.is_empty() => TextMatcher::Contains(if self.case_sensitive {
                    query.to_string()
                } else {
                    query.to_lowercase()
                }),
                _ => TextMatcher::All,
            },
        };
        Ok(matcher)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum TextMatcher {
    /// Empty query.
    All,
    Contains(String),
    Regex(Regex),
}

impl TextMatcher {
    pub(crate) fn row_matches(&self, config: &TextFacetConfig, project: &Project, row_index: usize) -> bool {
        if let TextMatcher::All = self {
            return true;
        }
        let text = config
            .column_name
            .as_deref()
            .and_then(|name| project.cell_value(row_index, name).ok().flatten())
            .filter(|value| !value.is_error())
            .map(|value| value.to_string());

        let hit = match (self, text) {
            (_, None) => false,
            (TextMatcher::Contains(query), Some(text)) => {
                if config.case_sensitive {
                    text.contains(query.as_str())
                } else {
                    text.to_lowercase().contains(query.as_str())
                }
            }
            (TextMatcher::Regex(regex), Some(text)) => regex.is_match(&text),
            (TextMatcher::All, Some(_)) => true,
        };
        hit != config.invert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Value;

    fn project() -> Project {
        let mut project = Project::with_columns(1, &["Name"]).unwrap();
        for name in ["Alice", "bob", "ALBERT"] {
            project.append_values(vec![Value::from(name)]);
        }
        project.append_values(vec![Value::Null]);
        project
    }

    fn matches(config: &TextFacetConfig) -> Vec<usize> {
        let project = project();
        let matcher = config.bind().unwrap();
        (0..project.row_count())
            .filter(|&i| matcher.row_matches(config, &project, i))
            .collect()
    }

    #[test]
    fn plain_search_is_case_insensitive_by_default() {
        let config: TextFacetConfig =
            serde_json::from_str(r#"{"columnName":"Name","query":"al","mode":"text"}"#).unwrap();
        assert_eq!(matches(&config), vec![0, 2]);
    }

    #[test]
    fn regex_search_and_invert() {
        let config: TextFacetConfig = serde_json::from_str(
            r#"{"columnName":"Name","query":"^[a-z]+$","mode":"regex","caseSensitive":true,"invert":true}"#,
        )
        .unwrap();
        assert_eq!(matches(&config), vec![0, 2, 3]);
    }

    #[test]
    fn bad_regex_and_missing_column_fail_validation() {
        let config: TextFacetConfig =
            serde_json::from_str(r#"{"columnName":"Name","query":"(","mode":"regex"}"#).unwrap();
        assert!(matches!(config.validate(), Err(FacetError::Invalid(_))));

        let config: TextFacetConfig = serde_json::from_str(r#"{"query":"x"}"#).unwrap();
        assert!(config.validate().is_err());
        assert_eq!(config.column_dependencies(), None);
    }

    #[test]
    fn empty_column_name_has_unknown_dependencies() {
        let config: TextFacetConfig =
            serde_json::from_str(r#"{"columnName":"","query":"x"}"#).unwrap();
        assert_eq!(config.column_dependencies(), None);

        let config: TextFacetConfig =
            serde_json::from_str(r#"{"columnName":"Name","query":"x"}"#).unwrap();
        assert_eq!(config.column_dependencies(), Some(ColumnSet::from(["Name".to_string()])));
    }
}

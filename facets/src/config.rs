//! FILENAME: facets/src/config.rs
//! PURPOSE: The closed set of facet configurations.
//! CONTEXT: A facet configuration is a serializable filter description.
//! Construction never validates, so a malformed record still round-trips
//! for diagnostics; `validate` is the separate explicit check, and
//! `apply` refuses configurations that do not pass it.

use crate::error::FacetResult;
use crate::facet::Facet;
use crate::list::ListFacetConfig;
use crate::range::{RangeFacetConfig, TimeRangeFacetConfig};
use crate::registry::registry;
use crate::scatterplot::ScatterplotFacetConfig;
use crate::text::TextFacetConfig;
use expr::ColumnSet;
use model::Project;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum FacetConfig {
    #[serde(rename = "list")]
    List(ListFacetConfig),
    #[serde(rename = "range")]
    Range(RangeFacetConfig),
    #[serde(rename = "timerange")]
    TimeRange(TimeRangeFacetConfig),
    #[serde(rename = "text")]
    Text(TextFacetConfig),
    #[serde(rename = "scatterplot")]
    Scatterplot(ScatterplotFacetConfig),
}

impl FacetConfig {
    /// Builds a configuration from a tagged JSON record via the registry.
    pub fn from_json(json: serde_json::Value) -> FacetResult<Self> {
        registry()?.construct(json)
    }

    pub fn from_json_str(text: &str) -> FacetResult<Self> {
        FacetConfig::from_json(serde_json::from_str(text)?)
    }

    /// The `type` tag.
    pub fn json_type(&self) -> &'static str {
        match self {
            FacetConfig::List(_) => "list",
            FacetConfig::Range(_) => "range",
            FacetConfig::TimeRange(_) => "timerange",
            FacetConfig::Text(_) => "text",
            FacetConfig::Scatterplot(_) => "scatterplot",
        }
    }

    /// Checks for missing or contradictory parameters and expressions
    /// that do not parse.
    pub fn validate(&self) -> FacetResult<()> {
        match self {
            FacetConfig::List(c) => c.validate(),
            FacetConfig::Range(c) => c.validate(),
            FacetConfig::TimeRange(c) => c.validate(),
            FacetConfig::Text(c) => c.validate(),
            FacetConfig::Scatterplot(c) => c.validate(),
        }
    }

    /// Columns the facet reads. `None` when that cannot be told, which
    /// is also the answer for a configuration missing its expression.
    pub fn column_dependencies(&self) -> Option<ColumnSet> {
        match self {
            FacetConfig::List(c) => c.column_dependencies(),
            FacetConfig::Range(c) => c.column_dependencies(),
            FacetConfig::TimeRange(c) => c.column_dependencies(),
            FacetConfig::Text(c) => c.column_dependencies(),
            FacetConfig::Scatterplot(c) => c.column_dependencies(),
        }
    }

    /// A copy with column names substituted. Best effort: references
    /// inside expressions that do not parse are left alone.
    pub fn rename_column_dependencies(&self, substitutions: &HashMap<String, String>) -> Self {
        match self {
            FacetConfig::List(c) => FacetConfig::List(c.rename_column_dependencies(substitutions)),
            FacetConfig::Range(c) => FacetConfig::Range(c.rename_column_dependencies(substitutions)),
            FacetConfig::TimeRange(c) => {
                FacetConfig::TimeRange(c.rename_column_dependencies(substitutions))
            }
            FacetConfig::Text(c) => FacetConfig::Text(c.rename_column_dependencies(substitutions)),
            FacetConfig::Scatterplot(c) => {
                FacetConfig::Scatterplot(c.rename_column_dependencies(substitutions))
            }
        }
    }

    /// Binds the facet to a project snapshot.
    pub fn apply<'p>(&self, project: &'p Project) -> FacetResult<Facet<'p>> {
        Facet::bind(self.clone(), project)
    }
}

impl<'de> Deserialize<'de> for FacetConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        FacetConfig::from_json(json).map_err(serde::de::Error::custom)
    }
}

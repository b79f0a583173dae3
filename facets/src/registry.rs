//! FILENAME: facets/src/registry.rs
//! PURPOSE: Maps facet type tags to payload constructors.
//! CONTEXT: Deserialization reads the `type` tag and looks it up here.
//! The builtin table is checked for duplicate tags the first time it is
//! used; an unknown tag is a typed error, never a fallback facet.

use crate::config::FacetConfig;
use crate::error::{FacetError, FacetResult};
use crate::list::ListFacetConfig;
use crate::range::{RangeFacetConfig, TimeRangeFacetConfig};
use crate::scatterplot::ScatterplotFacetConfig;
use crate::text::TextFacetConfig;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Builds a facet configuration from its JSON record.
pub type FacetConstructor = fn(serde_json::Value) -> Result<FacetConfig, serde_json::Error>;

#[derive(Debug, Default)]
pub struct FacetRegistry {
    constructors: FxHashMap<&'static str, FacetConstructor>,
}

impl FacetRegistry {
    pub fn new() -> Self {
        FacetRegistry::default()
    }

    /// Registers `tag`. A tag can only be registered once.
    pub fn register(&mut self, tag: &'static str, constructor: FacetConstructor) -> FacetResult<()> {
        if self.constructors.contains_key(tag) {
            return Err(FacetError::DuplicateType(tag.to_string()));
        }
        self.constructors.insert(tag, constructor);
        Ok(())
    }

    /// The five builtin facet types.
    pub fn with_builtins() -> FacetResult<Self> {
        let mut registry = FacetRegistry::new();
        registry.register("list", |json| {
            serde_json::from_value::<ListFacetConfig>(json).map(FacetConfig::List)
        })?;
        registry.register("range", |json| {
            serde_json::from_value::<RangeFacetConfig>(json).map(FacetConfig::Range)
        })?;
        registry.register("timerange", |json| {
            serde_json::from_value::<TimeRangeFacetConfig>(json).map(FacetConfig::TimeRange)
        })?;
        registry.register("text", |json| {
            serde_json::from_value::<TextFacetConfig>(json).map(FacetConfig::Text)
        })?;
        registry.register("scatterplot", |json| {
            serde_json::from_value::<ScatterplotFacetConfig>(json).map(FacetConfig::Scatterplot)
        })?;
        log::debug!("facet registry built with {} types", registry.len());
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

    /// Deserializes a tagged facet record.
    pub fn construct(&self, json: serde_json::Value) -> FacetResult<FacetConfig> {
        let tag = match json.get("type") {
            Some(serde_json::Value::String(tag)) => tag.clone(),
            _ => return Err(FacetError::MissingType),
        };
        let constructor = self
            .constructors
            .get(tag.as_str())
            .ok_or(FacetError::UnknownType(tag))?;
        Ok(constructor(json)?)
    }
}

static BUILTIN: Lazy<Result<FacetRegistry, String>> =
    Lazy::new(|| FacetRegistry::with_builtins().map_err(|e| e.to_string()));

/// The process-wide builtin registry.
pub fn registry() -> FacetResult<&'static FacetRegistry> {
    BUILTIN
        .as_ref()
        .map_err(|message| FacetError::Registry(message.clone()))
}

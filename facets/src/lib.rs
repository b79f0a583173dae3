//! FILENAME: facets/src/lib.rs
//! PURPOSE: Library root for facet configurations.
//! CONTEXT: Facets are row filters described as tagged JSON records.
//! This crate owns the closed variant set (list, range, timerange, text,
//! scatterplot), the tag registry used to deserialize them, their
//! validation and column analysis, and binding to a project snapshot.

pub mod config;
pub mod error;
mod expression;
pub mod facet;
pub mod list;
pub mod range;
pub mod registry;
pub mod scatterplot;
pub mod text;

pub use config::FacetConfig;
pub use error::{FacetError, FacetResult};
pub use facet::Facet;
pub use list::{DecoratedValue, ListFacetConfig, SelectionEntry};
pub use range::{RangeFacetConfig, TimeRangeFacetConfig};
pub use registry::{registry, FacetConstructor, FacetRegistry};
pub use scatterplot::{AxisScale, ScatterplotFacetConfig};
pub use text::{TextFacetConfig, TextSearchMode};

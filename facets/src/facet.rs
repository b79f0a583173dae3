//! FILENAME: facets/src/facet.rs
//! PURPOSE: A facet configuration bound to one project snapshot.
//! CONTEXT: Binding validates the configuration and compiles its
//! expressions and patterns once; row tests then only evaluate. The
//! facet borrows the project, so it cannot outlive the snapshot.

use crate::config::FacetConfig;
use crate::error::FacetResult;
use crate::list::ListMatcher;
use crate::text::TextMatcher;
use expr::Expression;
use model::Project;

#[derive(Debug, Clone)]
enum Matcher {
    List(ListMatcher),
    Range(Expression),
    TimeRange(Expression),
    Text(TextMatcher),
    Scatterplot(Expression, Expression),
}

#[derive(Debug, Clone)]
pub struct Facet<'p> {
    config: FacetConfig,
    project: &'p Project,
    matcher: Matcher,
}

impl<'p> Facet<'p> {
    pub(crate) fn bind(config: FacetConfig, project: &'p Project) -> FacetResult<Self> {
        let matcher = match &config {
            FacetConfig::List(c) => Matcher::List(c.bind()?),
            FacetConfig::Range(c) => Matcher::Range(c.bind()?),
            FacetConfig::TimeRange(c) => Matcher::TimeRange(c.bind()?),
            FacetConfig::Text(c) => Matcher::Text(c.bind()?),
            FacetConfig::Scatterplot(c) => {
                let (x, y) = c.bind()?;
                Matcher::Scatterplot(x, y)
            }
        };
        Ok(Facet {
            config,
            project,
            matcher,
        })
    }

    pub fn config(&self) -> &FacetConfig {
        &self.config
    }

    /// Whether the row at `row_index` passes this facet's selection.
    pub fn row_matches(&self, row_index: usize) -> bool {
        let project = self.project;
        match (&self.config, &self.matcher) {
            (FacetConfig::List(c), Matcher::List(m)) => m.row_matches(c, project, row_index),
            (FacetConfig::Range(c), Matcher::Range(e)) => c.row_matches(e, project, row_index),
            (FacetConfig::TimeRange(c), Matcher::TimeRange(e)) => c.row_matches(e, project, row_index),
            (FacetConfig::Text(c), Matcher::Text(m)) => m.row_matches(c, project, row_index),
            (FacetConfig::Scatterplot(c), Matcher::Scatterplot(x, y)) => {
                c.row_matches(x, y, project, row_index)
            }
            // bind() pairs every config with its own matcher
            _ => false,
        }
    }

    /// Indices of every matching row, in order.
    pub fn matching_rows(&self) -> Vec<usize> {
        (0..self.project.row_count())
            .filter(|&row_index| self.row_matches(row_index))
            .collect()
    }
}

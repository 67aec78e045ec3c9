//! Free-text preset search.
//!
//! A plain case-insensitive substring scan over every searchable preset in
//! both the primary and supplemental catalogs, optionally restricted to the
//! presets offered in one country. Results come back in catalog iteration
//! order, which is unspecified.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::feature::FeatureRecord;
use crate::metrics::MetricsSpan;

/// Search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Text to look for. `None` or empty matches nothing.
    pub text: Option<String>,
    /// Country code; presets restricted to other regions are dropped.
    #[serde(default)]
    pub country: Option<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            country: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Search defaults applied when a query leaves them open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Country used when the query names none.
    pub default_country: Option<String>,
    /// Drop presets marked `searchable: false`.
    pub require_searchable: bool,
}

impl SearchConfig {
    pub(crate) fn default_require_searchable() -> bool {
        true
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_country: None,
            require_searchable: Self::default_require_searchable(),
        }
    }
}

/// Every searchable preset matching `query`.
pub fn search(catalog: &Catalog, query: &SearchQuery) -> Vec<Arc<FeatureRecord>> {
    search_with_config(catalog, query, &SearchConfig::default())
}

/// [`search`] with explicit defaults.
pub fn search_with_config(
    catalog: &Catalog,
    query: &SearchQuery,
    config: &SearchConfig,
) -> Vec<Arc<FeatureRecord>> {
    let span = MetricsSpan::start();
    let country = query
        .country
        .as_deref()
        .or(config.default_country.as_deref());
    let hits = match query.text.as_deref() {
        Some(text) if !text.is_empty() => {
            let needle = text.to_lowercase();
            catalog
                .records()
                .filter(|feature| !config.require_searchable || feature.is_searchable())
                .filter(|feature| country.is_none_or(|code| feature.is_available_in(code)))
                .filter(|feature| feature.matches_lowercase(&needle))
                .cloned()
                .collect()
        }
        _ => Vec::new(),
    };

    tracing::trace!(
        text = query.text.as_deref().unwrap_or(""),
        country = country.unwrap_or(""),
        hits = hits.len(),
        "preset search"
    );
    if let Some(span) = span {
        span.record_search(hits.len());
    }
    hits
}

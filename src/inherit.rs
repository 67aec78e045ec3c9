//! Field inheritance along the preset id hierarchy.
//!
//! Preset ids are slash-delimited paths, and a preset that leaves a field
//! unset inherits it from the nearest ancestor that defines it:
//! `shop/supermarket/big` falls back to `shop/supermarket`, then to `shop`.
//! Only the primary catalog takes part; brand presets never act as parents.

use crate::catalog::Catalog;
use crate::feature::{FeatureRecord, parent_id};

/// Walk from `start_id` towards the root and return the first value
/// `extract` yields. Ids with no preset are skipped, not treated as the end
/// of the chain.
pub fn inherited_value<'c, T, F>(
    catalog: &'c Catalog,
    start_id: &str,
    mut extract: F,
) -> Option<T>
where
    F: FnMut(&'c FeatureRecord) -> Option<T>,
{
    let mut current = Some(start_id);
    while let Some(id) = current {
        if let Some(value) = catalog.primary(id).and_then(|feature| extract(feature.as_ref())) {
            return Some(value);
        }
        current = parent_id(id);
    }
    None
}

/// Nearest defined display name.
pub fn inherited_name<'c>(catalog: &'c Catalog, id: &str) -> Option<&'c str> {
    inherited_value(catalog, id, FeatureRecord::name)
}

/// Nearest defined icon name.
pub fn inherited_icon<'c>(catalog: &'c Catalog, id: &str) -> Option<&'c str> {
    inherited_value(catalog, id, FeatureRecord::icon)
}

/// Nearest defined field list.
pub fn inherited_fields<'c>(catalog: &'c Catalog, id: &str) -> Option<&'c [String]> {
    inherited_value(catalog, id, FeatureRecord::fields)
}

/// Nearest defined secondary field list.
pub fn inherited_more_fields<'c>(catalog: &'c Catalog, id: &str) -> Option<&'c [String]> {
    inherited_value(catalog, id, FeatureRecord::more_fields)
}

/// Subtitle for a preset: the inherited name of its parent category.
pub fn summary<'c>(catalog: &'c Catalog, feature: &FeatureRecord) -> Option<&'c str> {
    inherited_name(catalog, feature.parent_id()?)
}

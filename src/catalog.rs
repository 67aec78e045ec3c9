//! The preset catalog.
//!
//! A [`Catalog`] owns two disjoint sets of presets: the primary presets and
//! the supplemental brand presets. At construction it derives two
//! [`TagIndex`]es from them, one over the primary set and one over both,
//! sharing the known-key universe taken from primary ids alone.
//!
//! Construction either yields a complete catalog or a [`CatalogError`];
//! afterwards the catalog is read-only and can be shared across threads
//! (`Arc<Catalog>`) with no locking.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::CatalogError;
use crate::feature::{FeatureRecord, RawFeature, TagMap};
use crate::geometry::Geometry;
use crate::index::{KnownKeys, TagIndex};
use crate::inherit;
use crate::matcher::Matcher;
use crate::search::{SearchQuery, search};

type PresetMap = HashMap<String, Arc<FeatureRecord>>;

/// Immutable preset catalog with its tag indexes.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    primary: PresetMap,
    supplemental: PresetMap,
    known_keys: KnownKeys,
    primary_index: TagIndex,
    combined_index: TagIndex,
}

impl Catalog {
    /// Build a catalog from decoded presets.
    ///
    /// Fails on the first invalid preset, or when an id occurs twice in
    /// either collection or in both.
    pub fn from_raw<P, S>(primary: P, supplemental: S) -> Result<Self, CatalogError>
    where
        P: IntoIterator<Item = (String, RawFeature)>,
        S: IntoIterator<Item = (String, RawFeature)>,
    {
        let mut primary_map = PresetMap::new();
        insert_all(&mut primary_map, None, primary, false)?;
        let mut supplemental_map = PresetMap::new();
        insert_all(&mut supplemental_map, Some(&primary_map), supplemental, true)?;

        let known_keys = KnownKeys::from_ids(primary_map.keys().map(String::as_str));
        let primary_index = TagIndex::build(&known_keys, primary_map.values());
        let combined_index = TagIndex::build(
            &known_keys,
            primary_map.values().chain(supplemental_map.values()),
        );

        tracing::info!(
            primary = primary_map.len(),
            supplemental = supplemental_map.len(),
            known_keys = known_keys.len(),
            primary_buckets = primary_index.bucket_count(),
            combined_buckets = combined_index.bucket_count(),
            catch_all = combined_index.catch_all().len(),
            "preset catalog built"
        );

        Ok(Self {
            primary: primary_map,
            supplemental: supplemental_map,
            known_keys,
            primary_index,
            combined_index,
        })
    }

    /// Build from two JSON objects keyed by preset id. A `null`
    /// supplemental document means no brand presets.
    pub fn from_json_values(
        primary: JsonValue,
        supplemental: JsonValue,
    ) -> Result<Self, CatalogError> {
        let primary = decode_document(primary, "primary")?;
        let supplemental = match supplemental {
            JsonValue::Null => Vec::new(),
            other => decode_document(other, "supplemental")?,
        };
        Self::from_raw(primary, supplemental)
    }

    /// Parse and build from JSON text.
    pub fn from_json_str(primary: &str, supplemental: Option<&str>) -> Result<Self, CatalogError> {
        let primary: JsonValue = serde_json::from_str(primary)?;
        let supplemental = match supplemental {
            Some(text) => serde_json::from_str(text)?,
            None => JsonValue::Null,
        };
        Self::from_json_values(primary, supplemental)
    }

    /// Look up a preset by id, primary first.
    pub fn get(&self, id: &str) -> Option<&Arc<FeatureRecord>> {
        self.primary.get(id).or_else(|| self.supplemental.get(id))
    }

    pub fn primary(&self, id: &str) -> Option<&Arc<FeatureRecord>> {
        self.primary.get(id)
    }

    pub fn supplemental(&self, id: &str) -> Option<&Arc<FeatureRecord>> {
        self.supplemental.get(id)
    }

    pub fn primary_records(&self) -> impl Iterator<Item = &Arc<FeatureRecord>> {
        self.primary.values()
    }

    pub fn supplemental_records(&self) -> impl Iterator<Item = &Arc<FeatureRecord>> {
        self.supplemental.values()
    }

    /// Primary presets, then supplemental presets. Order within each set is
    /// unspecified.
    pub fn records(&self) -> impl Iterator<Item = &Arc<FeatureRecord>> {
        self.primary.values().chain(self.supplemental.values())
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.supplemental.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.supplemental.is_empty()
    }

    pub fn primary_len(&self) -> usize {
        self.primary.len()
    }

    pub fn supplemental_len(&self) -> usize {
        self.supplemental.len()
    }

    pub fn known_keys(&self) -> &KnownKeys {
        &self.known_keys
    }

    /// The combined index when `include_supplemental`, else the primary one.
    pub fn index(&self, include_supplemental: bool) -> &TagIndex {
        if include_supplemental {
            &self.combined_index
        } else {
            &self.primary_index
        }
    }

    /// Matcher with default settings.
    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(self)
    }

    /// Shorthand for [`Matcher::best_match`] with default settings.
    pub fn best_match(
        &self,
        object_tags: &TagMap,
        geometry: Geometry,
        include_supplemental: bool,
    ) -> Option<&Arc<FeatureRecord>> {
        self.matcher()
            .best_match(object_tags, geometry, include_supplemental)
    }

    /// Shorthand for [`search`](crate::search::search).
    pub fn search(&self, text: Option<&str>, country: Option<&str>) -> Vec<Arc<FeatureRecord>> {
        let query = SearchQuery {
            text: text.map(str::to_string),
            country: country.map(str::to_string),
        };
        search(self, &query)
    }

    /// Shorthand for [`inherit::inherited_value`].
    pub fn inherited_value<'c, T, F>(&'c self, start_id: &str, extract: F) -> Option<T>
    where
        F: FnMut(&'c FeatureRecord) -> Option<T>,
    {
        inherit::inherited_value(self, start_id, extract)
    }
}

fn decode_document(
    document: JsonValue,
    what: &'static str,
) -> Result<Vec<(String, RawFeature)>, CatalogError> {
    let JsonValue::Object(entries) = document else {
        return Err(CatalogError::MalformedDocument { what });
    };
    entries
        .into_iter()
        .map(|(id, value)| {
            let raw = RawFeature::from_json(&id, value)?;
            Ok((id, raw))
        })
        .collect()
}

fn insert_all<I>(
    target: &mut PresetMap,
    other: Option<&PresetMap>,
    entries: I,
    supplemental: bool,
) -> Result<(), CatalogError>
where
    I: IntoIterator<Item = (String, RawFeature)>,
{
    for (id, raw) in entries {
        if other.is_some_and(|map| map.contains_key(&id)) {
            return Err(CatalogError::DuplicateId { id });
        }
        match target.entry(id) {
            Entry::Occupied(slot) => {
                return Err(CatalogError::DuplicateId {
                    id: slot.key().clone(),
                });
            }
            Entry::Vacant(slot) => {
                let record = FeatureRecord::from_raw(slot.key().clone(), raw, supplemental)?;
                slot.insert(Arc::new(record));
            }
        }
    }
    Ok(())
}

//! Preset feature records.
//!
//! A [`FeatureRecord`] is one catalog entry: a tag pattern that identifies a
//! real-world category (`shop=supermarket`, `amenity=cafe`, a brand from the
//! supplemental dataset), the geometries it applies to, and the metadata used
//! by search and the UI. Records are decoded once from [`RawFeature`] and are
//! immutable afterwards.
//!
//! # Scoring
//!
//! [`FeatureRecord::score`] rates how well the record describes an object:
//!
//! ```text
//! 0                       geometry not listed, or a declared key is unmatched
//! 1 + Σ per declared key   w      exact value match
//!                          w / 2  value pattern `*`, any value present
//!                          0.1    `area=yes` absent on an area object
//!   + Σ extra addTags keys w      object already carries the extra tag
//! ```
//!
//! where `w` is the record's `matchScore`. Keys ending in `*` match any object
//! key with that prefix.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::error::CatalogError;
use crate::geometry::Geometry;

/// Key/value tags, ordered by key.
pub type TagMap = BTreeMap<String, String>;

/// Value pattern that accepts any value for its key.
pub const WILDCARD: &str = "*";

/// Bonus for `area=yes` when an area object omits the tag.
const AREA_DEFAULT_BONUS: f64 = 0.1;

/// Location code meaning "the whole world".
const WORLD_CODE: &str = "001";

fn default_match_score() -> f64 {
    1.0
}

/// Location restriction as it appears in the source data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocationSet {
    /// Region codes, geojson names, or `[lon, lat]` points.
    #[serde(default, deserialize_with = "lenient")]
    pub include: Option<Vec<JsonValue>>,
}

/// Decoded preset fields before validation.
///
/// Field names follow the upstream preset JSON. `tags` must be a map of
/// strings; every other field falls back to its default when absent or
/// wrongly shaped. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFeature {
    pub tags: Option<TagMap>,
    #[serde(default, deserialize_with = "lenient")]
    pub add_tags: Option<TagMap>,
    #[serde(default, deserialize_with = "lenient")]
    pub remove_tags: Option<TagMap>,
    #[serde(default, deserialize_with = "lenient")]
    pub fields: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub more_fields: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub geometry: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<String>,
    #[serde(rename = "imageURL", default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location_set: Option<RawLocationSet>,
    #[serde(default, deserialize_with = "lenient")]
    pub match_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reference: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub searchable: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub terms: Option<Vec<String>>,
}

impl RawFeature {
    /// Raw feature with only a tag pattern set.
    pub fn with_tags(tags: TagMap) -> Self {
        Self {
            tags: Some(tags),
            ..Default::default()
        }
    }

    /// Decode one preset's JSON object.
    ///
    /// Fails only when the value is not an object or `tags` is malformed.
    pub fn from_json(id: &str, value: JsonValue) -> Result<Self, CatalogError> {
        let _span = tracing::debug_span!("decode_preset", preset = %id).entered();
        serde_json::from_value(value).map_err(|source| CatalogError::MalformedRecord {
            id: id.to_string(),
            source,
        })
    }
}

/// Optional field decoder: a value of the wrong shape becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = JsonValue::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring malformed optional field");
            Ok(None)
        }
    }
}

/// One immutable catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    id: String,
    tags: TagMap,
    add_tags: Option<TagMap>,
    remove_tags: Option<TagMap>,
    geometry: Vec<Geometry>,
    match_score: f64,
    location_include: Option<Vec<String>>,
    name: Option<String>,
    terms: Vec<String>,
    searchable: bool,
    fields: Option<Vec<String>>,
    more_fields: Option<Vec<String>>,
    icon: Option<String>,
    image_url: Option<String>,
    reference: Option<BTreeMap<String, String>>,
    supplemental: bool,
    // Lowercased id, name and terms.
    search_keys: Vec<String>,
}

impl FeatureRecord {
    /// Validate a decoded preset.
    pub fn from_raw(
        id: impl Into<String>,
        raw: RawFeature,
        supplemental: bool,
    ) -> Result<Self, CatalogError> {
        let id = id.into();
        let Some(tags) = raw.tags else {
            return Err(CatalogError::MissingTags { id });
        };
        if tags.keys().any(|key| key.is_empty()) {
            return Err(CatalogError::EmptyTagKey { id });
        }

        let match_score = raw.match_score.unwrap_or_else(default_match_score);
        if !(match_score.is_finite() && match_score > 0.0) {
            return Err(CatalogError::InvalidMatchScore {
                id,
                score: match_score,
            });
        }

        let mut geometry = Vec::new();
        for name in raw.geometry.unwrap_or_default() {
            match name.parse::<Geometry>() {
                Ok(kind) if !geometry.contains(&kind) => geometry.push(kind),
                Ok(_) => {}
                Err(err) => tracing::debug!(preset = %id, "skipping geometry: {err}"),
            }
        }

        let location_include = normalize_location_set(&id, raw.location_set);
        let terms = raw.terms.unwrap_or_default();

        let mut search_keys = Vec::with_capacity(terms.len() + 2);
        search_keys.push(id.to_lowercase());
        if let Some(name) = &raw.name {
            search_keys.push(name.to_lowercase());
        }
        search_keys.extend(terms.iter().map(|term| term.to_lowercase()));

        Ok(Self {
            id,
            tags,
            add_tags: raw.add_tags,
            remove_tags: raw.remove_tags,
            geometry,
            match_score,
            location_include,
            name: raw.name,
            terms,
            searchable: raw.searchable.unwrap_or(true),
            fields: raw.fields,
            more_fields: raw.more_fields,
            icon: raw.icon,
            image_url: raw.image_url,
            reference: raw.reference,
            supplemental,
            search_keys,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The tag pattern every matching object must satisfy.
    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// Tags to write when the preset is applied. Defaults to [`tags`](Self::tags).
    pub fn add_tags(&self) -> &TagMap {
        self.add_tags.as_ref().unwrap_or(&self.tags)
    }

    /// Tags to delete when the preset is removed. Defaults to [`add_tags`](Self::add_tags).
    pub fn remove_tags(&self) -> &TagMap {
        self.remove_tags.as_ref().unwrap_or_else(|| self.add_tags())
    }

    pub fn geometry(&self) -> &[Geometry] {
        &self.geometry
    }

    pub fn applies_to(&self, geometry: Geometry) -> bool {
        self.geometry.contains(&geometry)
    }

    pub fn match_score(&self) -> f64 {
        self.match_score
    }

    /// Normalized region codes, or `None` when offered everywhere.
    pub fn location_include(&self) -> Option<&[String]> {
        self.location_include.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display name, falling back to the id.
    pub fn friendly_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// `true` for records from the supplemental (brand) dataset.
    pub fn is_supplemental(&self) -> bool {
        self.supplemental
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub fn more_fields(&self) -> Option<&[String]> {
        self.more_fields.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn reference(&self) -> Option<&BTreeMap<String, String>> {
        self.reference.as_ref()
    }

    pub fn parent_id(&self) -> Option<&str> {
        parent_id(&self.id)
    }

    /// Text before the first `/` of the id.
    pub fn top_level_key(&self) -> &str {
        top_level_key(&self.id)
    }

    /// Whether the preset is offered in `country`. Case-insensitive.
    pub fn is_available_in(&self, country: &str) -> bool {
        match &self.location_include {
            None => true,
            Some(codes) => codes.iter().any(|code| code.eq_ignore_ascii_case(country)),
        }
    }

    /// Case-insensitive substring match against id, name and terms.
    /// Empty text matches nothing.
    pub fn matches_search_text(&self, text: &str) -> bool {
        self.matches_lowercase(&text.to_lowercase())
    }

    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        !needle.is_empty() && self.search_keys.iter().any(|key| key.contains(needle))
    }

    /// Score how well this preset describes an object. `0.0` means no match.
    pub fn score(&self, object_tags: &TagMap, geometry: Geometry) -> f64 {
        if !self.applies_to(geometry) {
            return 0.0;
        }

        let mut total = 1.0;
        for (key, expected) in &self.tags {
            let found = match key.strip_suffix('*') {
                Some(prefix) => first_with_prefix(object_tags, prefix),
                None => object_tags.get(key).map(String::as_str),
            };
            match found {
                Some(value) if value == expected => total += self.match_score,
                Some(_) if expected == WILDCARD => total += self.match_score / 2.0,
                None if key == "area" && expected == "yes" && geometry == Geometry::Area => {
                    total += AREA_DEFAULT_BONUS
                }
                _ => return 0.0,
            }
        }

        // Every pattern key was visited above; only extra addTags keys count.
        if let Some(add_tags) = &self.add_tags {
            for (key, value) in add_tags {
                if !self.tags.contains_key(key) && object_tags.get(key) == Some(value) {
                    total += self.match_score;
                }
            }
        }
        total
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Parent of a slash-delimited id: `a/b/c` → `a/b`, `a` → `None`.
pub fn parent_id(id: &str) -> Option<&str> {
    id.rfind('/').map(|idx| &id[..idx])
}

/// Text before the first `/`.
pub fn top_level_key(id: &str) -> &str {
    id.split_once('/').map_or(id, |(head, _)| head)
}

fn first_with_prefix<'a>(tags: &'a TagMap, prefix: &str) -> Option<&'a str> {
    tags.range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .next()
        .filter(|(key, _)| key.starts_with(prefix))
        .map(|(_, value)| value.as_str())
}

fn normalize_location_set(id: &str, raw: Option<RawLocationSet>) -> Option<Vec<String>> {
    let entries = raw?.include?;
    let mut codes = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(code) = entry.as_str() else {
            // Point or polygon includes cannot be checked against a country code.
            tracing::debug!(preset = %id, "location set has non-code entry; treating as unrestricted");
            return None;
        };
        let code = code.to_ascii_lowercase();
        match code.as_str() {
            WORLD_CODE => return None,
            "conus" => codes.push("us".to_string()),
            _ => codes.push(code),
        }
    }
    Some(codes)
}

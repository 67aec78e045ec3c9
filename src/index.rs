//! Inverted tag index.
//!
//! Maps a tag key to every preset that declares it, so the matcher only
//! scores presets that could plausibly apply to an object instead of the
//! whole catalog. Only "known" keys get a bucket: a key is known when it is
//! the top-level segment of some primary preset id (`shop` for
//! `shop/supermarket`). Presets that declare no known key land in the
//! catch-all bucket under [`CATCH_ALL_KEY`], which the matcher always scans.
//!
//! Unknown keys are skipped for bucketing only; they still take part in
//! scoring.

use std::collections::HashMap;
use std::sync::Arc;

use crate::feature::{FeatureRecord, TagMap, top_level_key};

/// Bucket key for presets that declare no known tag key.
pub const CATCH_ALL_KEY: &str = "";

/// Top-level id segments of the primary catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownKeys {
    counts: HashMap<String, usize>,
}

impl KnownKeys {
    /// Count the top-level segment of each id.
    pub fn from_ids<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = HashMap::new();
        for id in ids {
            *counts.entry(top_level_key(id).to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    /// Number of ids sharing this top-level segment.
    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Tag key → presets declaring that key. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    buckets: HashMap<String, Vec<Arc<FeatureRecord>>>,
    records: usize,
}

impl TagIndex {
    /// Build an index over `records`, bucketing by keys in `known`.
    ///
    /// Bucket order follows the iteration order of `records`.
    pub fn build<'a, I>(known: &KnownKeys, records: I) -> Self
    where
        I: IntoIterator<Item = &'a Arc<FeatureRecord>>,
    {
        let mut buckets: HashMap<String, Vec<Arc<FeatureRecord>>> = HashMap::new();
        let mut count = 0usize;
        for record in records {
            count += 1;
            let mut added = false;
            for key in record.tags().keys().filter(|key| known.contains(key)) {
                buckets
                    .entry(key.clone())
                    .or_default()
                    .push(Arc::clone(record));
                added = true;
            }
            if !added {
                buckets
                    .entry(CATCH_ALL_KEY.to_string())
                    .or_default()
                    .push(Arc::clone(record));
            }
        }
        Self {
            buckets,
            records: count,
        }
    }

    /// Presets listed under `key`; empty when the key has no bucket.
    pub fn bucket(&self, key: &str) -> &[Arc<FeatureRecord>] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Presets that declare no known key.
    pub fn catch_all(&self) -> &[Arc<FeatureRecord>] {
        self.bucket(CATCH_ALL_KEY)
    }

    /// Bucket keys, including [`CATCH_ALL_KEY`] when that bucket exists.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Total length of the buckets [`candidates`](Self::candidates) visits.
    pub fn candidate_count(&self, object_tags: &TagMap) -> usize {
        object_tags
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(CATCH_ALL_KEY))
            .map(|key| self.bucket(key).len())
            .sum()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of distinct presets the index was built from.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Every preset worth scoring for an object: the bucket of each object
    /// tag key, then the catch-all bucket. A preset may be yielded more than
    /// once when it declares several of the object's keys.
    pub fn candidates<'s>(
        &'s self,
        object_tags: &TagMap,
    ) -> impl Iterator<Item = &'s Arc<FeatureRecord>> {
        object_tags
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(CATCH_ALL_KEY))
            .flat_map(move |key| self.bucket(key).iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::RawFeature;
    use std::collections::{BTreeMap, BTreeSet};

    fn preset(id: &str, pattern: &[(&str, &str)]) -> Arc<FeatureRecord> {
        let tags = pattern
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(FeatureRecord::from_raw(id, RawFeature::with_tags(tags), false).unwrap())
    }

    fn ids(records: &[Arc<FeatureRecord>]) -> Vec<&str> {
        records.iter().map(|r| r.id()).collect()
    }

    fn snapshot(index: &TagIndex) -> BTreeMap<String, BTreeSet<String>> {
        index
            .keys()
            .map(|key| {
                let members = index.bucket(key).iter().map(|r| r.id().to_string()).collect();
                (key.to_string(), members)
            })
            .collect()
    }

    #[test]
    fn known_keys_count_top_level_segments() {
        let known = KnownKeys::from_ids(["shop", "shop/bakery", "shop/butcher", "amenity/cafe"]);
        assert_eq!(known.len(), 2);
        assert_eq!(known.count("shop"), 3);
        assert_eq!(known.count("amenity"), 1);
        assert!(!known.contains("cuisine"));
    }

    #[test]
    fn presets_are_bucketed_under_every_known_key() {
        let known = KnownKeys::from_ids(["shop", "amenity"]);
        let records = vec![
            preset("shop/bakery", &[("shop", "bakery")]),
            preset("amenity/cafe/shop", &[("amenity", "cafe"), ("shop", "coffee")]),
            preset("amenity/cafe", &[("amenity", "cafe"), ("cuisine", "coffee_shop")]),
        ];
        let index = TagIndex::build(&known, &records);

        assert_eq!(ids(index.bucket("shop")), ["shop/bakery", "amenity/cafe/shop"]);
        assert_eq!(ids(index.bucket("amenity")), ["amenity/cafe/shop", "amenity/cafe"]);
        assert!(index.bucket("cuisine").is_empty());
        assert!(index.catch_all().is_empty());
        assert_eq!(index.record_count(), 3);
    }

    #[test]
    fn presets_without_known_keys_go_to_catch_all() {
        let known = KnownKeys::from_ids(["shop"]);
        let records = vec![
            preset("point", &[]),
            preset("disused", &[("disused:*", "*")]),
            preset("shop", &[("shop", "*")]),
        ];
        let index = TagIndex::build(&known, &records);

        assert_eq!(ids(index.catch_all()), ["point", "disused"]);
        assert_eq!(index.bucket_count(), 2);
    }

    #[test]
    fn candidates_visit_object_keys_then_catch_all() {
        let known = KnownKeys::from_ids(["shop", "amenity"]);
        let records = vec![
            preset("amenity/cafe", &[("amenity", "cafe")]),
            preset("shop/bakery", &[("shop", "bakery")]),
            preset("point", &[]),
        ];
        let index = TagIndex::build(&known, &records);

        let mut object = TagMap::new();
        object.insert("shop".into(), "bakery".into());
        object.insert("name".into(), "Kamps".into());
        let seen: Vec<&str> = index.candidates(&object).map(|r| r.id()).collect();
        assert_eq!(seen, ["shop/bakery", "point"]);

        let empty = TagMap::new();
        let seen: Vec<&str> = index.candidates(&empty).map(|r| r.id()).collect();
        assert_eq!(seen, ["point"]);
    }

    #[test]
    fn rebuild_is_identical() {
        let known = KnownKeys::from_ids(["shop", "amenity", "building"]);
        let records = vec![
            preset("shop/bakery", &[("shop", "bakery")]),
            preset("amenity/cafe", &[("amenity", "cafe"), ("building", "yes")]),
            preset("area", &[("area", "yes")]),
        ];
        let first = TagIndex::build(&known, &records);
        let second = TagIndex::build(&known, records.iter().rev());
        assert_eq!(snapshot(&first), snapshot(&second));
    }
}

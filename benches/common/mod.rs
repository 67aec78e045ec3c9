//! Common utilities for presetdb benchmarks
//!
//! Builds a synthetic catalog shaped like the real preset data: a handful of
//! top-level keys, many values per key, a few multi-key presets, generic
//! catch-all presets, and a brand layer on top.

#![allow(dead_code)]

use presetdb::{Catalog, Geometry, TagMap};
use serde_json::{Map, Value, json};

pub const TOP_LEVEL_KEYS: &[&str] = &[
    "amenity", "shop", "highway", "building", "leisure", "tourism", "natural", "landuse",
    "railway", "office",
];

const GEOMETRIES: &[&[&str]] = &[
    &["point", "area"],
    &["point", "vertex", "area"],
    &["line"],
    &["area"],
];

/// Primary catalog with `values_per_key` presets under each top-level key.
pub fn primary_catalog_json(values_per_key: usize) -> Value {
    let mut presets = Map::new();
    presets.insert(
        "point".into(),
        json!({ "tags": {}, "geometry": ["point"], "matchScore": 0.1 }),
    );
    presets.insert(
        "area".into(),
        json!({ "tags": { "area": "yes" }, "geometry": ["area"], "matchScore": 0.1 }),
    );
    for (k, key) in TOP_LEVEL_KEYS.iter().enumerate() {
        presets.insert(
            (*key).to_string(),
            json!({
                "tags": { *key: "*" },
                "geometry": ["point", "vertex", "line", "area"],
                "name": key,
            }),
        );
        for v in 0..values_per_key {
            let value = format!("value_{v}");
            let geometry = GEOMETRIES[(k + v) % GEOMETRIES.len()];
            presets.insert(
                format!("{key}/{value}"),
                json!({
                    "tags": { *key: value },
                    "geometry": geometry,
                    "name": format!("{key} {v}"),
                    "terms": [format!("term {v}"), format!("{key} alias {v}")],
                }),
            );
            if v % 10 == 0 {
                presets.insert(
                    format!("{key}/{value}/detailed"),
                    json!({
                        "tags": { *key: value, "detail": format!("d{v}") },
                        "geometry": geometry,
                        "matchScore": 1.2,
                    }),
                );
            }
        }
    }
    Value::Object(presets)
}

/// Brand presets: `brands_per_key` under the first value of each key.
pub fn supplemental_catalog_json(brands_per_key: usize) -> Value {
    let mut presets = Map::new();
    for key in TOP_LEVEL_KEYS {
        for b in 0..brands_per_key {
            let country = if b % 2 == 0 { "us" } else { "de" };
            presets.insert(
                format!("{key}/value_0/brand_{b}"),
                json!({
                    "tags": { *key: "value_0", "brand:wikidata": format!("Q{b}") },
                    "geometry": ["point", "area"],
                    "name": format!("Brand {b}"),
                    "locationSet": { "include": [country] },
                }),
            );
        }
    }
    Value::Object(presets)
}

pub fn build_catalog(values_per_key: usize, brands_per_key: usize) -> Catalog {
    Catalog::from_json_values(
        primary_catalog_json(values_per_key),
        supplemental_catalog_json(brands_per_key),
    )
    .expect("synthetic catalog is valid")
}

/// Objects spanning exact hits, wildcard fallbacks, brands and untagged nodes.
pub fn sample_objects() -> Vec<(TagMap, Geometry)> {
    let tags = |pairs: &[(&str, &str)]| -> TagMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    };
    vec![
        (tags(&[("amenity", "value_3")]), Geometry::Point),
        (tags(&[("shop", "value_10"), ("detail", "d10")]), Geometry::Area),
        (tags(&[("highway", "unknown")]), Geometry::Line),
        (
            tags(&[("shop", "value_0"), ("brand:wikidata", "Q7"), ("name", "Brand 7")]),
            Geometry::Point,
        ),
        (
            tags(&[("building", "yes"), ("amenity", "value_1"), ("name", "Town Hall")]),
            Geometry::Area,
        ),
        (TagMap::new(), Geometry::Point),
    ]
}

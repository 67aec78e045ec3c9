use std::error::Error;

use presetdb::{Catalog, CatalogError, ConfigLoadError, PresetsConfig};
use serde_json::{Value, json};

fn build(primary: Value) -> Result<Catalog, CatalogError> {
    Catalog::from_json_values(primary, Value::Null)
}

#[test]
fn missing_tags_is_fatal() {
    let err = build(json!({ "shop": { "name": "Shop" } })).unwrap_err();
    assert!(matches!(err, CatalogError::MissingTags { ref id } if id == "shop"));
    assert_eq!(err.to_string(), "preset `shop` has no `tags` field");
}

#[test]
fn non_string_tag_value_is_malformed() {
    let err = build(json!({ "shop": { "tags": { "shop": 1 } } })).unwrap_err();
    assert!(matches!(err, CatalogError::MalformedRecord { .. }));
    assert_eq!(err.preset_id(), Some("shop"));
    assert!(err.source().is_some());
}

#[test]
fn wrongly_shaped_optional_field_uses_default() {
    let catalog = build(json!({
        "amenity/cafe": {
            "tags": { "amenity": "cafe" },
            "geometry": ["point"],
            "terms": "coffee",
            "moreFields": { "not": "a list" }
        },
        "shop": { "tags": { "shop": "*" }, "geometry": "point" }
    }))
    .expect("optional fields are lenient");

    let cafe = catalog.get("amenity/cafe").unwrap();
    assert!(cafe.terms().is_empty());
    assert!(cafe.more_fields().is_none());
    assert!(catalog.get("shop").unwrap().geometry().is_empty());

    let mut tags = presetdb::TagMap::new();
    tags.insert("amenity".into(), "cafe".into());
    let best = catalog.best_match(&tags, presetdb::Geometry::Point, false);
    assert_eq!(best.map(|f| f.id()), Some("amenity/cafe"));
}

#[test]
fn empty_tag_key_is_rejected() {
    let err = build(json!({ "x": { "tags": { "": "y" } } })).unwrap_err();
    assert!(matches!(err, CatalogError::EmptyTagKey { .. }));
}

#[test]
fn match_score_must_be_positive() {
    for score in [0.0, -1.0] {
        let err = build(json!({
            "shop": { "tags": { "shop": "*" }, "matchScore": score }
        }))
        .unwrap_err();
        assert!(
            matches!(err, CatalogError::InvalidMatchScore { score: s, .. } if s == score),
            "{score}"
        );
    }
}

#[test]
fn id_in_both_namespaces_is_rejected() {
    let err = Catalog::from_json_values(
        json!({ "shop/supermarket": { "tags": { "shop": "supermarket" } } }),
        json!({ "shop/supermarket": { "tags": { "shop": "supermarket" } } }),
    )
    .unwrap_err();
    assert_eq!(err.preset_id(), Some("shop/supermarket"));
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn top_level_document_must_be_an_object() {
    let err = Catalog::from_json_str("[]", None).unwrap_err();
    assert!(matches!(err, CatalogError::MalformedDocument { what: "primary" }));
    assert_eq!(err.preset_id(), None);

    let err = Catalog::from_json_str("{}", Some("not json")).unwrap_err();
    assert!(matches!(err, CatalogError::Json(_)));
}

#[test]
fn unknown_geometry_and_fields_are_tolerated() {
    let catalog = build(json!({
        "type/route": {
            "tags": { "type": "route" },
            "geometry": ["relation"],
            "countryCodes": ["us"],
            "aliases": ["Trail"]
        }
    }))
    .expect("lenient fields");
    assert!(catalog.get("type/route").unwrap().geometry().is_empty());
}

#[test]
fn empty_catalog_is_valid_and_matches_nothing() {
    let catalog = Catalog::from_json_str("{}", None).unwrap();
    assert!(catalog.is_empty());
    assert!(
        catalog
            .best_match(&Default::default(), presetdb::Geometry::Point, true)
            .is_none()
    );
    assert!(catalog.search(Some("anything"), None).is_empty());
}

#[test]
fn config_errors_are_typed() {
    assert!(matches!(
        PresetsConfig::from_yaml("version: [1"),
        Err(ConfigLoadError::YamlParse(_))
    ));
    assert!(matches!(
        PresetsConfig::from_yaml("version: \"3\""),
        Err(ConfigLoadError::UnsupportedVersion(_))
    ));
    assert!(matches!(
        PresetsConfig::from_yaml("version: \"1\"\nmatcher:\n  parallel_threshold: 0\n"),
        Err(ConfigLoadError::Validation(_))
    ));
}

//! Tag-preset matching and indexing for OpenStreetMap-style objects.
//!
//! A [`Catalog`] holds the preset definitions (primary presets plus an
//! optional supplemental brand set) and the inverted tag indexes derived from
//! them. On top of it this crate answers three questions:
//!
//! - which preset best describes an object's tags and geometry
//!   ([`Matcher::best_match`]),
//! - which presets match a free-text query ([`search`]),
//! - what value a preset inherits from its ancestors in the id hierarchy
//!   ([`inherited_value`] and friends).
//!
//! ```
//! use presetdb::{Catalog, Geometry, TagMap};
//! use serde_json::json;
//!
//! let catalog = Catalog::from_json_values(
//!     json!({
//!         "shop": { "tags": { "shop": "*" }, "geometry": ["point", "area"] },
//!         "shop/supermarket": {
//!             "tags": { "shop": "supermarket" },
//!             "geometry": ["point", "area"],
//!             "name": "Supermarket"
//!         }
//!     }),
//!     serde_json::Value::Null,
//! )?;
//!
//! let mut tags = TagMap::new();
//! tags.insert("shop".into(), "supermarket".into());
//! let best = catalog.best_match(&tags, Geometry::Area, false);
//! assert_eq!(best.map(|f| f.id()), Some("shop/supermarket"));
//! # Ok::<(), presetdb::CatalogError>(())
//! ```
//!
//! The catalog is immutable once built and can be shared across threads
//! behind an `Arc`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod index;
pub mod inherit;
pub mod matcher;
pub mod metrics;
pub mod search;

pub use catalog::Catalog;
pub use config::{ConfigLoadError, MatcherYamlConfig, PresetsConfig, SearchYamlConfig};
pub use error::CatalogError;
pub use feature::{FeatureRecord, RawFeature, RawLocationSet, TagMap, WILDCARD, parent_id};
pub use geometry::{Geometry, UnknownGeometry};
pub use index::{CATCH_ALL_KEY, KnownKeys, TagIndex};
pub use inherit::{
    inherited_fields, inherited_icon, inherited_more_fields, inherited_name, inherited_value,
    summary,
};
pub use matcher::{MatchOutcome, Matcher, MatcherConfig};
pub use metrics::{MatchMetrics, set_match_metrics};
pub use search::{SearchConfig, SearchQuery, search, search_with_config};

//! Error types produced while building a [`Catalog`](crate::Catalog).
//!
//! Catalog construction is the only fallible stage in this crate. Matching,
//! search and inheritance lookups never fail: missing input simply yields no
//! result. A load error means the preset data itself is broken and the
//! catalog cannot be used at all.
//!
//! | Error | Cause |
//! |-------|-------|
//! | [`MissingTags`](CatalogError::MissingTags) | Record has no `tags` field |
//! | [`EmptyTagKey`](CatalogError::EmptyTagKey) | `tags` contains an empty key |
//! | [`InvalidMatchScore`](CatalogError::InvalidMatchScore) | `matchScore` is not a positive finite number |
//! | [`DuplicateId`](CatalogError::DuplicateId) | Same id defined twice across the input collections |
//! | [`MalformedRecord`](CatalogError::MalformedRecord) | Record is not an object, or `tags` has the wrong JSON shape |
//! | [`MalformedDocument`](CatalogError::MalformedDocument) | Top-level input is not an object of records |

use thiserror::Error;

/// Fatal catalog load error.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("preset `{id}` has no `tags` field")]
    MissingTags { id: String },

    #[error("preset `{id}` declares an empty tag key")]
    EmptyTagKey { id: String },

    #[error("preset `{id}` has invalid matchScore {score} (must be positive and finite)")]
    InvalidMatchScore { id: String, score: f64 },

    #[error("preset `{id}` is defined more than once")]
    DuplicateId { id: String },

    #[error("preset `{id}` is malformed: {source}")]
    MalformedRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{what} catalog must be a JSON object keyed by preset id")]
    MalformedDocument { what: &'static str },

    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Id of the offending preset, when the error concerns a single record.
    pub fn preset_id(&self) -> Option<&str> {
        match self {
            CatalogError::MissingTags { id }
            | CatalogError::EmptyTagKey { id }
            | CatalogError::InvalidMatchScore { id, .. }
            | CatalogError::DuplicateId { id }
            | CatalogError::MalformedRecord { id, .. } => Some(id),
            CatalogError::MalformedDocument { .. } | CatalogError::Json(_) => None,
        }
    }
}

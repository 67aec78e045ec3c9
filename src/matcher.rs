//! Best-preset matching.
//!
//! [`Matcher`] answers "which preset best describes this object?" by scoring
//! only the presets listed in the tag-index buckets of the object's keys plus
//! the catch-all bucket, and keeping the highest score.
//!
//! Ties between equal top scores go to the first preset seen, and the visit
//! order depends on bucket order, which is not a stable property of the
//! catalog. Callers must treat the choice among tied presets as arbitrary.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::feature::{FeatureRecord, TagMap};
use crate::geometry::Geometry;
use crate::index::TagIndex;
use crate::metrics::MetricsSpan;

/// Runtime knobs for [`Matcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Candidate count at which the bucket scan is spread over the rayon
    /// pool. Ignored without the `parallel` feature.
    pub parallel_threshold: usize,
}

impl MatcherConfig {
    pub(crate) fn default_parallel_threshold() -> usize {
        2048
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: Self::default_parallel_threshold(),
        }
    }
}

/// Winning preset and its score.
#[derive(Debug, Clone, Copy)]
pub struct MatchOutcome<'c> {
    pub feature: &'c Arc<FeatureRecord>,
    pub score: f64,
}

/// Stateless matcher over a borrowed [`Catalog`].
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'c> {
    catalog: &'c Catalog,
    config: MatcherConfig,
}

impl<'c> Matcher<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_config(catalog, MatcherConfig::default())
    }

    pub fn with_config(catalog: &'c Catalog, config: MatcherConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Best preset for an object, or `None` when nothing scores above zero.
    ///
    /// `include_supplemental` selects the index that also covers brand
    /// presets.
    pub fn best_match(
        &self,
        object_tags: &TagMap,
        geometry: Geometry,
        include_supplemental: bool,
    ) -> Option<&'c Arc<FeatureRecord>> {
        self.best_match_scored(object_tags, geometry, include_supplemental)
            .map(|outcome| outcome.feature)
    }

    /// Like [`best_match`](Self::best_match) but also returns the score.
    pub fn best_match_scored(
        &self,
        object_tags: &TagMap,
        geometry: Geometry,
        include_supplemental: bool,
    ) -> Option<MatchOutcome<'c>> {
        let span = MetricsSpan::start();
        let index = self.catalog.index(include_supplemental);
        let scored = index.candidate_count(object_tags);

        let best = if self.use_parallel(scored) {
            scan_parallel(index, object_tags, geometry)
        } else {
            scan(index, object_tags, geometry)
        };

        match &best {
            Some(outcome) => tracing::trace!(
                preset = outcome.feature.id(),
                score = outcome.score,
                scored,
                %geometry,
                "best match"
            ),
            None => tracing::trace!(scored, %geometry, "no preset matched"),
        }
        if let Some(span) = span {
            span.record_match(geometry, scored, best.is_some());
        }
        best
    }

    #[cfg(feature = "parallel")]
    fn use_parallel(&self, candidates: usize) -> bool {
        candidates >= self.config.parallel_threshold
    }

    #[cfg(not(feature = "parallel"))]
    fn use_parallel(&self, _candidates: usize) -> bool {
        false
    }
}

fn scan<'c>(
    index: &'c TagIndex,
    object_tags: &TagMap,
    geometry: Geometry,
) -> Option<MatchOutcome<'c>> {
    let mut best: Option<MatchOutcome<'c>> = None;
    let mut best_score = 0.0;
    for feature in index.candidates(object_tags) {
        let score = feature.score(object_tags, geometry);
        // Strict comparison: the first preset seen keeps a tie.
        if score > best_score {
            best_score = score;
            best = Some(MatchOutcome { feature, score });
        }
    }
    best
}

#[cfg(feature = "parallel")]
fn scan_parallel<'c>(
    index: &'c TagIndex,
    object_tags: &TagMap,
    geometry: Geometry,
) -> Option<MatchOutcome<'c>> {
    use rayon::prelude::*;

    let buckets: Vec<&'c [Arc<FeatureRecord>]> = object_tags
        .keys()
        .map(|key| index.bucket(key))
        .chain(std::iter::once(index.catch_all()))
        .collect();

    // `reduce_with` combines in visit order, so ties resolve like `scan`.
    buckets
        .into_par_iter()
        .flat_map_iter(|bucket| bucket.iter())
        .filter_map(|feature| {
            let score = feature.score(object_tags, geometry);
            (score > 0.0).then_some(MatchOutcome { feature, score })
        })
        .reduce_with(|best, next| if next.score > best.score { next } else { best })
}

#[cfg(not(feature = "parallel"))]
fn scan_parallel<'c>(
    index: &'c TagIndex,
    object_tags: &TagMap,
    geometry: Geometry,
) -> Option<MatchOutcome<'c>> {
    scan(index, object_tags, geometry)
}

//! Nearest-neighbour search within a single point set
//!
//! For every point the closest *other* point is found by great-circle
//! distance. Results come back one per input point, in input order. When
//! several points are equally close, the one earliest in the input wins.

use geopair_core::error::{GeopairError, Result};
use geopair_core::models::{GeoPoint, NearestPairResult, SearchStrategy};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::distance::Sphere;
use crate::index::PointIndex;
use crate::validation::ensure_searchable;

/// Callback receiving the number of points processed so far
pub type ProgressFn = Arc<dyn Fn(usize) + Send + Sync>;

/// A neighbour candidate: position in the input and distance in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub distance_m: f64,
}

impl Candidate {
    /// Strictly closer, or equally close and earlier in the input
    pub fn beats(&self, other: &Candidate) -> bool {
        self.distance_m < other.distance_m
            || (self.distance_m == other.distance_m && self.index < other.index)
    }
}

/// Options controlling a nearest-neighbour search
#[derive(Clone, Default)]
pub struct NearestOptions {
    pub sphere: Sphere,
    pub strategy: SearchStrategy,
    pub parallel: bool,
    pub cancel: Option<CancellationToken>,
    pub progress: Option<ProgressFn>,
}

impl NearestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sphere(mut self, sphere: Sphere) -> Self {
        self.sphere = sphere;
        self
    }

    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn cancel_with(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn on_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl std::fmt::Debug for NearestOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearestOptions")
            .field("sphere", &self.sphere)
            .field("strategy", &self.strategy)
            .field("parallel", &self.parallel)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// Nearest other point to `points[index]` by full scan.
///
/// A fold over candidates in input order that only replaces the running best
/// on a strictly smaller distance.
pub fn nearest_by_scan(points: &[GeoPoint], index: usize, sphere: &Sphere) -> Option<Candidate> {
    let source = &points[index];
    points
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .map(|(j, other)| Candidate { index: j, distance_m: sphere.haversine(source, other) })
        .fold(None, |best, candidate| match best {
            Some(current) if candidate.distance_m >= current.distance_m => Some(current),
            _ => Some(candidate),
        })
}

/// Find the nearest neighbour of every point with default options
pub fn find_nearest_pairs(points: &[GeoPoint]) -> Result<Vec<NearestPairResult>> {
    find_nearest_pairs_with(points, &NearestOptions::default())
}

/// Find the nearest neighbour of every point.
///
/// Fails without partial output on fewer than two points, an invalid
/// coordinate, a duplicated identifier, or cancellation.
pub fn find_nearest_pairs_with(
    points: &[GeoPoint],
    options: &NearestOptions,
) -> Result<Vec<NearestPairResult>> {
    ensure_searchable(points)?;

    let total = points.len();
    tracing::debug!(
        "Searching nearest neighbours of {} points ({:?}, parallel: {})",
        total,
        options.strategy,
        options.parallel
    );

    let index = match options.strategy {
        SearchStrategy::Indexed => Some(PointIndex::build(points)),
        SearchStrategy::BruteForce => None,
    };
    let completed = AtomicUsize::new(0);

    let search_one = |i: usize| -> Result<NearestPairResult> {
        if options.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(GeopairError::Cancelled { completed: completed.load(Ordering::Relaxed), total });
        }

        let best = match &index {
            Some(index) => index.nearest_to(i, &options.sphere),
            None => nearest_by_scan(points, i, &options.sphere),
        }
        .ok_or(GeopairError::EmptyInput { count: total })?;

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(progress) = &options.progress {
            progress(done);
        }

        Ok(NearestPairResult::new(&points[i], &points[best.index], best.distance_m))
    };

    let results: Result<Vec<_>> = if options.parallel {
        (0..total).into_par_iter().map(search_one).collect()
    } else {
        (0..total).map(search_one).collect()
    };
    let results = results?;

    tracing::info!("Found nearest neighbours for {} points", results.len());
    Ok(results)
}

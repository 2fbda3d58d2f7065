use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::distance::pairwise::min_distances_embedded;
use crate::distance::{DistanceMatrix, EngineError};
use crate::geo::{EmbeddedPoint, Line};

/// Directional distances from `source` to every line of `targets`.
///
/// Row `i` belongs to `targets[i]` and has `source.len()` entries. Rows are
/// computed in parallel on the current rayon pool; each worker writes only
/// its own pre-assigned row.
pub fn all_pair_distances(source: &Line, targets: &[Line]) -> DistanceMatrix {
    debug!(
        "computing distances from {} ({} points) to {} lines",
        source.id(),
        source.len(),
        targets.len()
    );

    let source_points: Vec<EmbeddedPoint> = source.embedded_points().collect();
    let mut matrix: DistanceMatrix = vec![Vec::new(); targets.len()];

    matrix
        .par_iter_mut()
        .zip(targets.par_iter())
        .for_each(|(row, target)| {
            *row = if target.id() == source.id() {
                vec![0.0; source_points.len()]
            } else {
                let target_points: Vec<EmbeddedPoint> = target.embedded_points().collect();
                min_distances_embedded(&source_points, &target_points)
            };
        });

    matrix
}

/// Runs distance fan-outs either on the global rayon pool or on a dedicated
/// pool with a fixed number of workers.
#[derive(Debug, Default)]
pub struct DistanceEngine {
    pool: Option<ThreadPool>,
}

impl DistanceEngine {
    /// `None` uses the global pool, `Some(n)` bounds concurrency to `n` workers.
    pub fn new(workers: Option<usize>) -> Result<Self, EngineError> {
        let pool = match workers {
            Some(n) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("distance-worker-{i}"))
                    .build()?,
            ),
            None => None,
        };
        Ok(DistanceEngine { pool })
    }

    pub fn workers(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    pub fn all_pair_distances(&self, source: &Line, targets: &[Line]) -> DistanceMatrix {
        match &self.pool {
            Some(pool) => pool.install(|| all_pair_distances(source, targets)),
            None => all_pair_distances(source, targets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::pointwise_min_distances;
    use crate::geo::GeoCoordinate;

    fn diagonal(id: &str, range: std::ops::Range<i32>) -> Line {
        let coords = range
            .map(|d| GeoCoordinate::new(d as f64, d as f64))
            .collect();
        Line::new(id, coords)
    }

    fn sample_lines() -> Vec<Line> {
        (0..12)
            .map(|i| diagonal(&format!("{}|{}", i % 3, i), (i * 2)..(i * 2 + 3 + i % 4)))
            .collect()
    }

    #[test]
    fn rows_match_pairwise_in_input_order() {
        let lines = sample_lines();
        let source = &lines[5];
        let matrix = all_pair_distances(source, &lines);
        assert_eq!(matrix.len(), lines.len());
        for (row, target) in matrix.iter().zip(&lines) {
            assert_eq!(row.len(), source.len());
            assert_eq!(row, &pointwise_min_distances(source, target));
        }
        assert!(matrix[5].iter().all(|&d| d == 0.0));
    }

    #[test]
    fn order_is_stable_across_runs() {
        let lines = sample_lines();
        let engine = DistanceEngine::new(Some(4)).expect("pool");
        let first = engine.all_pair_distances(&lines[0], &lines);
        for _ in 0..20 {
            assert_eq!(engine.all_pair_distances(&lines[0], &lines), first);
        }
    }

    #[test]
    fn bounded_pool_matches_global_pool() {
        let lines = sample_lines();
        let bounded = DistanceEngine::new(Some(2)).expect("pool");
        assert_eq!(bounded.workers(), 2);
        let global = DistanceEngine::default();
        assert_eq!(
            bounded.all_pair_distances(&lines[3], &lines),
            global.all_pair_distances(&lines[3], &lines)
        );
    }

    #[test]
    fn empty_targets_give_empty_matrix() {
        let line = diagonal("0|1", 0..4);
        assert!(all_pair_distances(&line, &[]).is_empty());
    }
}

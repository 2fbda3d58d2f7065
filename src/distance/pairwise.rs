use crate::distance::DistanceVector;
use crate::geo::{EmbeddedPoint, Line};

/// For every point of `source`, the smallest chord distance to any point of
/// `target`. The result has one entry per source point, in source order.
///
/// Not symmetric: swapping the arguments changes both the values and the
/// length of the result.
///
/// Lines with the same id are treated as identical and yield all zeros
/// without any embedding work. An empty `target` yields `f64::INFINITY`
/// for every source point.
pub fn pointwise_min_distances(source: &Line, target: &Line) -> DistanceVector {
    if source.id() == target.id() {
        return vec![0.0; source.len()];
    }

    let source_points: Vec<EmbeddedPoint> = source.embedded_points().collect();
    let target_points: Vec<EmbeddedPoint> = target.embedded_points().collect();
    min_distances_embedded(&source_points, &target_points)
}

/// Same scan as [`pointwise_min_distances`] over points that are already
/// embedded. No identity short-circuit happens here.
pub fn min_distances_embedded(source: &[EmbeddedPoint], target: &[EmbeddedPoint]) -> DistanceVector {
    source
        .iter()
        .map(|p| {
            target
                .iter()
                .map(|q| p.distance(q))
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}

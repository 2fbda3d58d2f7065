pub mod matrix;
pub mod pairwise;

use thiserror::Error;

pub use matrix::{all_pair_distances, DistanceEngine};
pub use pairwise::pointwise_min_distances;

/// Minimum distance from each point of a source line to a target line.
pub type DistanceVector = Vec<f64>;

/// One [`DistanceVector`] per target line, in target order.
pub type DistanceMatrix = Vec<DistanceVector>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build distance worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

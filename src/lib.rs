pub mod config;
pub mod data;
pub mod distance;
pub mod geo;
pub mod ingest;
pub mod network;

pub use distance::{
    all_pair_distances, pointwise_min_distances, DistanceEngine, DistanceMatrix, DistanceVector,
};
pub use geo::{EmbeddedPoint, GeoCoordinate, Line};

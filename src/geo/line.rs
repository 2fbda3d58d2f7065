use serde::{Deserialize, Serialize};

use crate::geo::coord::{EmbeddedPoint, GeoCoordinate};

/// An ordered path of coordinates, identified by `id`.
///
/// Ids are `"{member}|{line_id}"` when produced by [`crate::ingest`]. Two
/// lines are the same line iff their ids are equal.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Line {
    id: String,
    coords: Vec<GeoCoordinate>,
}

impl Line {
    pub fn new(id: impl Into<String>, coords: Vec<GeoCoordinate>) -> Self {
        Line {
            id: id.into(),
            coords,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn coords(&self) -> &[GeoCoordinate] {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn latitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.coords.iter().map(|c| c.latitude)
    }

    pub fn longitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.coords.iter().map(|c| c.longitude)
    }

    /// Unit-sphere embedding of every point, in path order.
    pub fn embedded_points(&self) -> impl Iterator<Item = EmbeddedPoint> + '_ {
        self.coords.iter().map(GeoCoordinate::to_embedded)
    }

    /// Mean of the embedded points, mapped back to degrees.
    pub fn centroid(&self) -> Option<GeoCoordinate> {
        if self.coords.is_empty() {
            return None;
        }
        let origin = EmbeddedPoint {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        };
        let sum = self.embedded_points().fold(origin, |acc, p| acc + p);
        Some((sum * (1.0 / self.coords.len() as f64)).to_geo())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn diagonal(id: &str, range: std::ops::Range<i32>) -> Line {
        let coords = range
            .map(|d| GeoCoordinate::new(d as f64, d as f64))
            .collect();
        Line::new(id, coords)
    }

    #[test]
    fn projections_follow_coordinates() {
        let line = Line::new(
            "0|1",
            vec![GeoCoordinate::new(10.0, -20.0), GeoCoordinate::new(11.0, -21.0)],
        );
        assert_eq!(line.latitudes().collect::<Vec<_>>(), vec![10.0, 11.0]);
        assert_eq!(line.longitudes().collect::<Vec<_>>(), vec![-20.0, -21.0]);
    }

    #[test]
    fn embedded_points_keep_path_order() {
        let line = diagonal("0|1", 0..4);
        let pts: Vec<EmbeddedPoint> = line.embedded_points().collect();
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[2], GeoCoordinate::new(2.0, 2.0).to_embedded());
    }

    #[test]
    fn centroid_of_symmetric_line() {
        let line = Line::new(
            "0|1",
            vec![GeoCoordinate::new(10.0, 0.0), GeoCoordinate::new(-10.0, 0.0)],
        );
        let c = line.centroid().expect("centroid");
        assert_approx_eq!(c.latitude, 0.0, 1e-9);
        assert_approx_eq!(c.longitude, 0.0, 1e-9);
    }

    #[test]
    fn centroid_across_antimeridian() {
        let line = Line::new(
            "0|1",
            vec![GeoCoordinate::new(0.0, 179.0), GeoCoordinate::new(0.0, -179.0)],
        );
        let c = line.centroid().expect("centroid");
        assert_approx_eq!(c.longitude.abs(), 180.0, 1e-9);
    }

    #[test]
    fn empty_line_has_no_centroid() {
        let line = Line::new("0|1", Vec::new());
        assert!(line.is_empty());
        assert!(line.centroid().is_none());
    }
}

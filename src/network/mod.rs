use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo::{EmbeddedPoint, Line};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub source: String,
    pub target: String,
    /// Chord distance between the two line centroids.
    pub distance: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Network {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

/// Links every pair of lines whose centroids lie within `max_distance` of
/// each other on the unit sphere. Lines without points become isolated nodes.
pub fn proximity_network(lines: &[Line], max_distance: f64) -> Network {
    let centroids: Vec<Option<EmbeddedPoint>> = lines
        .iter()
        .map(|l| l.centroid().map(|c| c.to_embedded()))
        .collect();

    let nodes = lines
        .iter()
        .map(|l| Node {
            id: l.id().to_string(),
        })
        .collect();

    let mut links = Vec::new();
    for i in 0..lines.len() {
        let Some(a) = centroids[i] else { continue };
        for j in (i + 1)..lines.len() {
            let Some(b) = centroids[j] else { continue };
            let distance = a.distance(&b);
            if distance <= max_distance {
                links.push(Link {
                    source: lines[i].id().to_string(),
                    target: lines[j].id().to_string(),
                    distance,
                });
            }
        }
    }

    debug!(
        "network over {} lines has {} links within {max_distance}",
        lines.len(),
        links.len()
    );
    Network { nodes, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoCoordinate;

    fn point_line(id: &str, lat: f64, lon: f64) -> Line {
        Line::new(id, vec![GeoCoordinate::new(lat, lon)])
    }

    #[test]
    fn links_only_close_centroids() {
        let lines = vec![
            point_line("0|1", 0.0, 0.0),
            point_line("0|2", 0.0, 1.0),
            point_line("0|3", 0.0, 90.0),
        ];
        let net = proximity_network(&lines, 0.05);
        assert_eq!(net.nodes.len(), 3);
        assert_eq!(net.links.len(), 1);
        assert_eq!(net.links[0].source, "0|1");
        assert_eq!(net.links[0].target, "0|2");
    }

    #[test]
    fn empty_lines_are_isolated() {
        let lines = vec![point_line("0|1", 0.0, 0.0), Line::new("0|2", Vec::new())];
        let net = proximity_network(&lines, 2.0);
        assert_eq!(net.nodes.len(), 2);
        assert!(net.links.is_empty());
    }
}

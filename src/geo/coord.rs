use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees. Ranges are not validated.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeoCoordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

/// Point on the unit sphere in Euclidean 3-space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmbeddedPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoCoordinate {
            latitude,
            longitude,
        }
    }

    /// Maps the coordinate onto the unit sphere:
    /// `x = cos(lat)cos(lon)`, `y = cos(lat)sin(lon)`, `z = sin(lat)`.
    pub fn to_embedded(&self) -> EmbeddedPoint {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        EmbeddedPoint {
            x: lat.cos() * lon.cos(),
            y: lat.cos() * lon.sin(),
            z: lat.sin(),
        }
    }
}

impl EmbeddedPoint {
    /// Inverse of [`GeoCoordinate::to_embedded`]. The origin has no defined
    /// longitude and yields whatever `atan2(0, 0)` gives.
    pub fn to_geo(&self) -> GeoCoordinate {
        GeoCoordinate {
            latitude: self.z.atan2((self.x * self.x + self.y * self.y).sqrt()).to_degrees(),
            longitude: self.y.atan2(self.x).to_degrees(),
        }
    }

    /// Euclidean (chord) distance. At most 2 for points on the unit sphere.
    pub fn distance(&self, other: &EmbeddedPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl std::ops::Add for EmbeddedPoint {
    type Output = EmbeddedPoint;

    fn add(self, rhs: EmbeddedPoint) -> EmbeddedPoint {
        EmbeddedPoint {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl std::ops::Mul<f64> for EmbeddedPoint {
    type Output = EmbeddedPoint;

    fn mul(self, rhs: f64) -> EmbeddedPoint {
        EmbeddedPoint {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

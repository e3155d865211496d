//! Distance and direction between positions on the globe.
//!
//! Distances are geodesic (WGS84 ellipsoid), bearings are spherical.

use geo::{Bearing, Distance, Geodesic, Haversine, Point};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Point::new(p.longitude, p.latitude)
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self::new(p.y(), p.x())
    }
}

/// Geodesic distance between two positions in meters
pub fn distance_m(a: Position, b: Position) -> f64 {
    Geodesic.distance(Point::from(a), Point::from(b))
}

/// Initial great-circle bearing from `from` to `to`, clockwise from north in `[0, 360)`
pub fn bearing_deg(from: Position, to: Position) -> f64 {
    Haversine.bearing(Point::from(from), Point::from(to))
}

//! Geographic coordinates and unit vectors on the sphere.
//!
//! [`LatLng`] is a validated degree pair; [`Point`] is the corresponding
//! unit 3-vector used by the cell decomposition and covering code. All
//! angular math happens on `Point` -- `LatLng` exists so that invalid
//! coordinates are rejected once, at the boundary.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A validated latitude/longitude pair in degrees.
///
/// Fields are private so a `LatLng` can only be obtained through
/// [`LatLng::new`], which enforces the [-90,90] x [-180,180] ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Creates a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if !lat.is_finite() || !lng.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::InvalidCoordinate { lat, lng });
        }
        Ok(LatLng { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Converts to a unit vector on the sphere.
    pub fn to_point(self) -> Point {
        let lat = self.lat.to_radians();
        let lng = self.lng.to_radians();
        Point {
            x: lat.cos() * lng.cos(),
            y: lat.cos() * lng.sin(),
            z: lat.sin(),
        }
    }
}

/// A point in R^3, normally a unit vector on the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Point) -> Point {
        Point {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(&self) -> Point {
        let n = self.norm();
        Point {
            x: self.x / n,
            y: self.y / n,
            z: self.z / n,
        }
    }

    /// Angle in radians between two vectors.
    ///
    /// Uses atan2 of cross/dot, which stays accurate for both nearly
    /// parallel and nearly antipodal vectors (acos of the dot does not).
    pub fn angle(&self, other: &Point) -> f64 {
        self.cross(other).norm().atan2(self.dot(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(LatLng::new(90.1, 0.0).is_err());
        assert!(LatLng::new(-90.1, 0.0).is_err());
        assert!(LatLng::new(0.0, 180.5).is_err());
        assert!(LatLng::new(0.0, -180.5).is_err());
        assert!(LatLng::new(f64::NAN, 0.0).is_err());
        assert!(LatLng::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_boundary_coordinates() {
        assert!(LatLng::new(90.0, 180.0).is_ok());
        assert!(LatLng::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn to_point_is_unit_length() {
        let p = LatLng::new(40.7128, -74.0060).unwrap().to_point();
        assert!((p.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn angle_between_poles_is_pi() {
        let north = LatLng::new(90.0, 0.0).unwrap().to_point();
        let south = LatLng::new(-90.0, 0.0).unwrap().to_point();
        assert!((north.angle(&south) - std::f64::consts::PI).abs() < 1e-9);
    }
}

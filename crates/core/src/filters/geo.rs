//! Great-circle helpers for radius targeting.

use crate::constants::EARTH_RADIUS_METERS;

/// Haversine distance between two WGS84 points, in meters.
pub fn haversine_distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Lat/lng rectangle enclosing a circle. Used as a cheap SQL prefilter before
/// the exact haversine check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn around(lat: f64, lng: f64, meters: f64) -> Self {
        let angular = meters / EARTH_RADIUS_METERS;
        let d_lat = angular.to_degrees();
        let min_lat = (lat - d_lat).max(-90.0);
        let max_lat = (lat + d_lat).min(90.0);

        // Near the poles (or for huge radii) every longitude can be in range.
        let cos_lat = lat.to_radians().cos();
        if max_lat >= 90.0 || min_lat <= -90.0 || cos_lat <= f64::EPSILON {
            return Self {
                min_lat,
                max_lat,
                min_lng: -180.0,
                max_lng: 180.0,
            };
        }
        let ratio = angular.sin() / cos_lat;
        if ratio >= 1.0 {
            return Self {
                min_lat,
                max_lat,
                min_lng: -180.0,
                max_lng: 180.0,
            };
        }
        let d_lng = ratio.asin().to_degrees();
        // Boxes crossing the antimeridian fall back to the full longitude range.
        if lng - d_lng < -180.0 || lng + d_lng > 180.0 {
            return Self {
                min_lat,
                max_lat,
                min_lng: -180.0,
                max_lng: 180.0,
            };
        }
        Self {
            min_lat,
            max_lat,
            min_lng: lng - d_lng,
            max_lng: lng + d_lng,
        }
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

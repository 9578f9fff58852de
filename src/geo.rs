//! Great-circle distance and travel-time estimates.
//!
//! Haversine on a spherical Earth (R = 6371 km). Accuracy is ~0.5% against
//! the ellipsoid, which is plenty for "how far is X from Y" answers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LocateError, Result};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const MILES_PER_KM: f64 = 0.621371;
pub const NAUTICAL_MILES_PER_KM: f64 = 0.539957;

/// Assumed cruise speeds (km/h) behind the travel-time estimates.
/// These are modeling approximations, not physical guarantees.
pub const FLIGHT_SPEED_KMH: f64 = 800.0;
pub const DRIVING_SPEED_KMH: f64 = 80.0;
pub const WALKING_SPEED_KMH: f64 = 5.0;

/// A validated point on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = LocateError;

    fn try_from(raw: RawCoordinate) -> std::result::Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Fallback origin when the caller has no position: New York City.
    pub const DEFAULT_ORIGIN: Coordinate = Coordinate { latitude: 40.7128, longitude: -74.0060 };

    /// Build a coordinate. Out-of-range or non-finite values are rejected, never clamped.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !lat_ok || !lon_ok {
            return Err(LocateError::InvalidCoordinate { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_coords(self.latitude, self.longitude))
    }
}

/// Distance between two coordinates in every unit the site displays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub kilometers: f64,
    pub miles: f64,
    pub nautical_miles: f64,
    pub estimated_flight_hours: f64,
}

impl DistanceResult {
    pub fn from_km(km: f64) -> Self {
        Self {
            kilometers: km,
            miles: miles(km),
            nautical_miles: nautical_miles(km),
            estimated_flight_hours: estimated_flight_hours(km),
        }
    }

    /// One-decimal label in the requested unit, e.g. "5570.2 km".
    pub fn format(&self, unit: DistanceUnit) -> String {
        match unit {
            DistanceUnit::Kilometers => format!("{:.1} km", self.kilometers),
            DistanceUnit::Miles => format!("{:.1} mi", self.miles),
        }
    }
}

/// Display unit toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(Self::Kilometers),
            "mi" | "miles" => Ok(Self::Miles),
            _ => Err(format!("Unknown unit '{}'. Use 'km' or 'mi'.", s)),
        }
    }
}

/// Driving, flying and walking time for one distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelEstimates {
    pub driving_hours: f64,
    pub flying_hours: f64,
    pub walking_hours: f64,
}

impl TravelEstimates {
    pub fn from_km(km: f64) -> Self {
        Self {
            driving_hours: estimated_driving_hours(km),
            flying_hours: estimated_flight_hours(km),
            walking_hours: estimated_walking_hours(km),
        }
    }

    /// `(mode, "x.y hours")` pairs in display order.
    pub fn labels(&self) -> [(&'static str, String); 3] {
        [
            ("driving", format!("{:.1} hours", round_for_display(self.driving_hours))),
            ("flying", format!("{:.1} hours", round_for_display(self.flying_hours))),
            ("walking", format!("{:.1} hours", round_for_display(self.walking_hours))),
        ]
    }
}

/// Haversine great-circle distance in kilometres.
///
/// Uses absolute deltas so that `haversine_km(a, b)` and `haversine_km(b, a)`
/// are bit-for-bit equal.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).abs().to_radians();
    let d_lon = (b.longitude - a.longitude).abs().to_radians();
    let cos_product = a.latitude.to_radians().cos() * b.latitude.to_radians().cos();

    let h = (d_lat / 2.0).sin().powi(2) + cos_product * (d_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Distance between two coordinates with all derived units.
pub fn distance(a: Coordinate, b: Coordinate) -> DistanceResult {
    DistanceResult::from_km(haversine_km(a, b))
}

pub fn miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

pub fn nautical_miles(km: f64) -> f64 {
    km * NAUTICAL_MILES_PER_KM
}

pub fn estimated_flight_hours(km: f64) -> f64 {
    km / FLIGHT_SPEED_KMH
}

pub fn estimated_driving_hours(km: f64) -> f64 {
    km / DRIVING_SPEED_KMH
}

pub fn estimated_walking_hours(km: f64) -> f64 {
    km / WALKING_SPEED_KMH
}

/// Round to one decimal place for display.
pub fn round_for_display(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Hemisphere form: `40.7128°N, 74.0060°W`.
pub fn format_coords(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", lat.abs(), ns, lon.abs(), ew)
}

/// Six-decimal `lat, lon` pair.
pub fn format_decimal(coordinate: Coordinate) -> String {
    format!("{:.6}, {:.6}", coordinate.latitude, coordinate.longitude)
}

//! Record shapes shared by the collaborators, the planner and the aggregator.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geo::{Coordinate, DistanceResult, TravelEstimates};
use crate::slug::RelatedRoute;

fn unknown_region() -> String {
    "unknown".to_string()
}

/// One entry of a bulk location dataset.
///
/// The wire shape is the flat array the listing backends serve:
/// `{"name": "...", "state": "...", "lat": .., "lon": .., "county": null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNamedLocation", into = "RawNamedLocation")]
pub struct NamedLocation {
    pub name: String,
    pub region: String,
    pub coordinate: Coordinate,
    pub county: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct RawNamedLocation {
    name: String,
    #[serde(default = "unknown_region")]
    state: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    county: Option<String>,
}

impl TryFrom<RawNamedLocation> for NamedLocation {
    type Error = crate::LocateError;

    fn try_from(raw: RawNamedLocation) -> std::result::Result<Self, Self::Error> {
        let coordinate = Coordinate::new(raw.lat, raw.lon)?;
        NamedLocation::new(raw.name, raw.state, coordinate, raw.county)
    }
}

impl From<NamedLocation> for RawNamedLocation {
    fn from(loc: NamedLocation) -> Self {
        Self {
            name: loc.name,
            state: loc.region,
            lat: loc.coordinate.latitude(),
            lon: loc.coordinate.longitude(),
            county: loc.county,
        }
    }
}

/// Hashable identity of a [`NamedLocation`]: (name, county, coordinate bits).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationIdentity<'a> {
    name: &'a str,
    county: Option<&'a str>,
    lat_bits: u64,
    lon_bits: u64,
}

impl NamedLocation {
    /// Build a record. The name must contain something other than whitespace;
    /// a blank region becomes "unknown".
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        coordinate: Coordinate,
        county: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(crate::LocateError::EmptyName(name));
        }
        let region = region.into();
        let region = if region.trim().is_empty() { unknown_region() } else { region };
        Ok(Self { name, region, coordinate, county })
    }

    /// Equal coordinates give equal identities; `-0.0` folds into `0.0`.
    pub fn identity(&self) -> LocationIdentity<'_> {
        LocationIdentity {
            name: &self.name,
            county: self.county.as_deref(),
            lat_bits: (self.coordinate.latitude() + 0.0).to_bits(),
            lon_bits: (self.coordinate.longitude() + 0.0).to_bits(),
        }
    }
}

/// Forward geocoding answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub coordinate: Coordinate,
    pub display_name: String,
}

/// Reverse geocoding answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocode {
    pub display_name: String,
    /// ISO 3166-1 alpha-2, upper case.
    pub country_code: String,
}

/// Current conditions at a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub condition: String,
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub wind_speed_kmh: f64,
    pub humidity_pct: u8,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Offset of the observed location from UTC.
    pub utc_offset_seconds: i32,
}

impl WeatherSnapshot {
    /// Sunrise and sunset as `HH:MM` local to the observed location.
    pub fn local_sun_times(&self) -> (String, String) {
        let offset = FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix());
        (
            self.sunrise.with_timezone(&offset).format("%H:%M").to_string(),
            self.sunset.with_timezone(&offset).format("%H:%M").to_string(),
        )
    }
}

/// Country facts shown next to a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryMetadata {
    /// e.g. "EUR (€)"
    pub currency: String,
    pub languages: Vec<String>,
    /// e.g. "UTC+01:00"
    pub timezone: String,
    pub neighbor_codes: Vec<String>,
}

impl CountryMetadata {
    /// Placeholder shown when no directory knows the country.
    pub fn not_available() -> Self {
        Self {
            currency: "N/A".to_string(),
            languages: vec!["N/A".to_string()],
            timezone: "--".to_string(),
            neighbor_codes: Vec::new(),
        }
    }
}

/// Where a route starts when the caller asks "from me".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Origin {
    /// Position reported by the caller (browser, GPS, flag).
    Detected(Coordinate),
    /// No position available; use [`Coordinate::DEFAULT_ORIGIN`].
    Default,
}

impl Origin {
    pub fn coordinate(&self) -> Coordinate {
        match self {
            Self::Detected(c) => *c,
            Self::Default => Coordinate::DEFAULT_ORIGIN,
        }
    }
}

/// One end of a computed route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEndpoint {
    /// Title-cased query the user asked for.
    pub label: String,
    pub display_name: String,
    pub coordinate: Coordinate,
}

/// Everything a distance page shows about a pair of places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteReport {
    pub slug: String,
    pub source: RouteEndpoint,
    pub destination: RouteEndpoint,
    pub distance: DistanceResult,
    pub travel: TravelEstimates,
}

/// Destination facts gathered from the collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub display_name: String,
    pub country_code: String,
    pub country: CountryMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
    /// Links from each bordering country to the place.
    pub neighbor_routes: Vec<RelatedRoute>,
    /// Links from [`POPULAR_ROUTE_CITIES`](crate::slug::POPULAR_ROUTE_CITIES).
    pub popular_routes: Vec<RelatedRoute>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_location_wire_shape() {
        let json = r#"{"name": "Blue Springs", "state": "Alabama", "lat": 31.66128, "lon": -85.50744, "county": null}"#;
        let loc: NamedLocation = serde_json::from_str(json).unwrap();
        assert_eq!(loc.name, "Blue Springs");
        assert_eq!(loc.region, "Alabama");
        assert_eq!(loc.county, None);
        assert_eq!(loc.coordinate.latitude(), 31.66128);

        let back = serde_json::to_value(&loc).unwrap();
        assert_eq!(back["state"], "Alabama");
        assert_eq!(back["lon"], -85.50744);
    }

    #[test]
    fn test_named_location_missing_state() {
        let loc: NamedLocation =
            serde_json::from_str(r#"{"name": "Rockport", "lat": 28.02, "lon": -97.05}"#).unwrap();
        assert_eq!(loc.region, "unknown");
    }

    #[test]
    fn test_named_location_rejects_bad_records() {
        assert!(serde_json::from_str::<NamedLocation>(r#"{"name": "", "state": "X", "lat": 1.0, "lon": 1.0}"#).is_err());
        assert!(serde_json::from_str::<NamedLocation>(r#"{"name": "A", "state": "X", "lat": 95.0, "lon": 1.0}"#).is_err());
    }

    #[test]
    fn test_identity_ignores_region() {
        let c = Coordinate::new(39.084, -77.1528).unwrap();
        let a = NamedLocation::new("Rockville", "Maryland", c, None).unwrap();
        let b = NamedLocation::new("Rockville", "MD", c, None).unwrap();
        let other_county = NamedLocation::new("Rockville", "Maryland", c, Some("Montgomery".into())).unwrap();
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), other_county.identity());
    }

    #[test]
    fn test_identity_signed_zero() {
        let positive = Coordinate::new(0.0, 0.0).unwrap();
        let negative = Coordinate::new(-0.0, -0.0).unwrap();
        assert_eq!(positive, negative);

        let a = NamedLocation::new("Null Island", "Atlantic", positive, None).unwrap();
        let b = NamedLocation::new("Null Island", "Atlantic", negative, None).unwrap();
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_local_sun_times() {
        let snapshot = WeatherSnapshot {
            condition: "clear".into(),
            description: "clear sky".into(),
            temperature_c: 21.0,
            feels_like_c: 20.0,
            wind_speed_kmh: 11.0,
            humidity_pct: 40,
            sunrise: "2026-06-21T04:43:00Z".parse().unwrap(),
            sunset: "2026-06-21T20:21:00Z".parse().unwrap(),
            utc_offset_seconds: 3600,
        };
        assert_eq!(snapshot.local_sun_times(), ("05:43".to_string(), "21:21".to_string()));
    }

    #[test]
    fn test_origin_default() {
        assert_eq!(Origin::Default.coordinate(), Coordinate::DEFAULT_ORIGIN);
    }
}

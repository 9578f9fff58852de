//! Collaborator ports and their offline implementations.
//!
//! The planner only sees the traits. Network-backed geocoders and weather
//! services live outside this crate; the built-in tables here keep the CLI
//! and the tests working without a connection.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::{CountryMetadata, NamedLocation, Place, ReverseGeocode, WeatherSnapshot};
use crate::error::{LocateError, Result};
use crate::geo::{haversine_km, Coordinate};
use crate::slug::primary_component;

// ─── Ports ──────────────────────────────────────────────────────

/// Name ↔ coordinate lookups.
pub trait Geocoder: Send + Sync {
    /// `NotFound` when nothing matches.
    fn geocode(&self, name: &str) -> Result<Place>;
    fn reverse_geocode(&self, coordinate: Coordinate) -> Result<ReverseGeocode>;
}

pub trait WeatherProvider: Send + Sync {
    /// `Unavailable` when the service cannot answer.
    fn fetch_weather(&self, coordinate: Coordinate) -> Result<WeatherSnapshot>;
}

pub trait CountryDirectory: Send + Sync {
    fn fetch_country_metadata(&self, country_code: &str) -> Result<CountryMetadata>;

    /// English short name for an ISO code, if known.
    fn country_name(&self, _country_code: &str) -> Option<String> {
        None
    }
}

/// Source of the bulk records behind a listing page.
pub trait LocationDataset: Send + Sync {
    fn load_location_dataset(&self) -> Result<Vec<NamedLocation>>;
}

// ─── Built-in gazetteer ─────────────────────────────────────────

struct BuiltinCity {
    names: &'static [&'static str], // canonical + aliases, lower case
    display: &'static str,
    lat: f64,
    lon: f64,
    country_code: &'static str,
}

const BUILTIN_CITIES: &[BuiltinCity] = &[
    BuiltinCity {
        names: &["new york", "newyork", "nyc", "new york city"],
        display: "New York, New York, United States",
        lat: 40.7128, lon: -74.0060, country_code: "US",
    },
    BuiltinCity {
        names: &["los angeles"],
        display: "Los Angeles, California, United States",
        lat: 34.0522, lon: -118.2437, country_code: "US",
    },
    BuiltinCity {
        names: &["chicago"],
        display: "Chicago, Illinois, United States",
        lat: 41.8781, lon: -87.6298, country_code: "US",
    },
    BuiltinCity {
        names: &["washington", "washington dc"],
        display: "Washington, District of Columbia, United States",
        lat: 38.9072, lon: -77.0369, country_code: "US",
    },
    BuiltinCity {
        names: &["rockville"],
        display: "Rockville, Maryland, United States",
        lat: 39.0840, lon: -77.1528, country_code: "US",
    },
    BuiltinCity {
        names: &["little rock"],
        display: "Little Rock, Arkansas, United States",
        lat: 34.7465, lon: -92.2896, country_code: "US",
    },
    BuiltinCity {
        names: &["colorado springs"],
        display: "Colorado Springs, Colorado, United States",
        lat: 38.8339, lon: -104.8214, country_code: "US",
    },
    BuiltinCity {
        names: &["toronto"],
        display: "Toronto, Ontario, Canada",
        lat: 43.6532, lon: -79.3832, country_code: "CA",
    },
    BuiltinCity {
        names: &["mexico city", "ciudad de mexico"],
        display: "Mexico City, Mexico",
        lat: 19.4326, lon: -99.1332, country_code: "MX",
    },
    BuiltinCity {
        names: &["sao paulo", "são paulo"],
        display: "São Paulo, São Paulo, Brazil",
        lat: -23.5505, lon: -46.6333, country_code: "BR",
    },
    BuiltinCity {
        names: &["london"],
        display: "London, England, United Kingdom",
        lat: 51.5074, lon: -0.1278, country_code: "GB",
    },
    BuiltinCity {
        names: &["paris"],
        display: "Paris, Île-de-France, France",
        lat: 48.8566, lon: 2.3522, country_code: "FR",
    },
    BuiltinCity {
        names: &["berlin"],
        display: "Berlin, Germany",
        lat: 52.5200, lon: 13.4050, country_code: "DE",
    },
    BuiltinCity {
        names: &["madrid"],
        display: "Madrid, Community of Madrid, Spain",
        lat: 40.4168, lon: -3.7038, country_code: "ES",
    },
    BuiltinCity {
        names: &["rome", "roma"],
        display: "Rome, Lazio, Italy",
        lat: 41.9028, lon: 12.4964, country_code: "IT",
    },
    BuiltinCity {
        names: &["stockholm", "stokholm"],
        display: "Stockholm, Sweden",
        lat: 59.3293, lon: 18.0686, country_code: "SE",
    },
    BuiltinCity {
        names: &["oslo"],
        display: "Oslo, Norway",
        lat: 59.9139, lon: 10.7522, country_code: "NO",
    },
    BuiltinCity {
        names: &["moscow", "moskva"],
        display: "Moscow, Russia",
        lat: 55.7558, lon: 37.6173, country_code: "RU",
    },
    BuiltinCity {
        names: &["istanbul"],
        display: "Istanbul, Türkiye",
        lat: 41.0082, lon: 28.9784, country_code: "TR",
    },
    BuiltinCity {
        names: &["cairo", "al-qahirah"],
        display: "Cairo, Egypt",
        lat: 30.0444, lon: 31.2357, country_code: "EG",
    },
    BuiltinCity {
        names: &["lagos"],
        display: "Lagos, Nigeria",
        lat: 6.5244, lon: 3.3792, country_code: "NG",
    },
    BuiltinCity {
        names: &["nairobi"],
        display: "Nairobi, Kenya",
        lat: -1.2921, lon: 36.8219, country_code: "KE",
    },
    BuiltinCity {
        names: &["dubai"],
        display: "Dubai, United Arab Emirates",
        lat: 25.2048, lon: 55.2708, country_code: "AE",
    },
    BuiltinCity {
        names: &["mumbai", "bombay"],
        display: "Mumbai, Maharashtra, India",
        lat: 19.0760, lon: 72.8777, country_code: "IN",
    },
    BuiltinCity {
        names: &["delhi", "new delhi"],
        display: "New Delhi, Delhi, India",
        lat: 28.6139, lon: 77.2090, country_code: "IN",
    },
    BuiltinCity {
        names: &["beijing", "peking"],
        display: "Beijing, China",
        lat: 39.9042, lon: 116.4074, country_code: "CN",
    },
    BuiltinCity {
        names: &["shanghai"],
        display: "Shanghai, China",
        lat: 31.2304, lon: 121.4737, country_code: "CN",
    },
    BuiltinCity {
        names: &["tokyo"],
        display: "Tokyo, Japan",
        lat: 35.6762, lon: 139.6503, country_code: "JP",
    },
    BuiltinCity {
        names: &["sydney"],
        display: "Sydney, New South Wales, Australia",
        lat: -33.8688, lon: 151.2093, country_code: "AU",
    },
    BuiltinCity {
        names: &["tromso", "tromsø", "tromsoe"],
        display: "Tromsø, Troms, Norway",
        lat: 69.6492, lon: 18.9553, country_code: "NO",
    },
];

/// Reverse lookups farther than this from every built-in city miss.
pub const REVERSE_RADIUS_KM: f64 = 50.0;

/// Compute edit distance between two strings (Levenshtein).
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let n = b.len();

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Offline geocoder over a small table of world cities.
///
/// Lookup order: exact alias, then substring, then edit distance ≤ 2.
/// Queries may carry a qualifier ("Paris, France"); only the first
/// component is matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinGazetteer;

impl BuiltinGazetteer {
    pub fn new() -> Self {
        Self
    }

    fn find(&self, query: &str) -> Option<&'static BuiltinCity> {
        let lowered = primary_component(query).to_lowercase();
        let q = lowered.as_str();
        if q.is_empty() {
            return None;
        }

        // Exact match first
        if let Some(city) = BUILTIN_CITIES.iter().find(|c| c.names.iter().any(|name| *name == q)) {
            return Some(city);
        }

        // Substring match; short fragments are too ambiguous
        if q.chars().count() >= 3 {
            let hit = BUILTIN_CITIES.iter().find(|c| {
                c.names
                    .iter()
                    .any(|name| name.contains(q) || (name.len() >= 4 && q.contains(name)))
            });
            if hit.is_some() {
                return hit;
            }
        }

        // Fuzzy match (edit distance <= 2)
        BUILTIN_CITIES
            .iter()
            .flat_map(|c| c.names.iter().map(move |name| (c, edit_distance(q, name))))
            .filter(|(_, dist)| *dist <= 2)
            .min_by_key(|(_, dist)| *dist)
            .map(|(c, _)| c)
    }

    /// Canonical names of every built-in city.
    pub fn city_names(&self) -> Vec<&'static str> {
        BUILTIN_CITIES.iter().map(|c| c.names[0]).collect()
    }
}

fn city_coordinate(city: &BuiltinCity) -> Result<Coordinate> {
    Coordinate::new(city.lat, city.lon)
}

impl Geocoder for BuiltinGazetteer {
    fn geocode(&self, name: &str) -> Result<Place> {
        let city = self
            .find(name)
            .ok_or_else(|| LocateError::NotFound(name.to_string()))?;
        debug!(query = name, matched = city.names[0], "builtin geocode");
        Ok(Place {
            coordinate: city_coordinate(city)?,
            display_name: city.display.to_string(),
        })
    }

    fn reverse_geocode(&self, coordinate: Coordinate) -> Result<ReverseGeocode> {
        let mut nearest: Option<(&BuiltinCity, f64)> = None;
        for city in BUILTIN_CITIES {
            let km = haversine_km(coordinate, city_coordinate(city)?);
            if nearest.map_or(true, |(_, best)| km < best) {
                nearest = Some((city, km));
            }
        }

        match nearest {
            Some((city, km)) if km <= REVERSE_RADIUS_KM => Ok(ReverseGeocode {
                display_name: city.display.to_string(),
                country_code: city.country_code.to_string(),
            }),
            _ => Err(LocateError::NotFound(coordinate.to_string())),
        }
    }
}

// ─── Built-in country directory ─────────────────────────────────

struct BuiltinCountry {
    code: &'static str,
    currency: &'static str,
    languages: &'static [&'static str],
    timezone: &'static str,
    neighbors: &'static [&'static str],
}

const BUILTIN_COUNTRIES: &[BuiltinCountry] = &[
    BuiltinCountry { code: "US", currency: "USD ($)", languages: &["English"], timezone: "UTC-05:00", neighbors: &["CA", "MX"] },
    BuiltinCountry { code: "GB", currency: "GBP (£)", languages: &["English"], timezone: "UTC+00:00", neighbors: &["IE"] },
    BuiltinCountry { code: "DE", currency: "EUR (€)", languages: &["German"], timezone: "UTC+01:00", neighbors: &["AT", "BE", "CH", "CZ", "DK", "FR", "LU", "NL", "PL"] },
    BuiltinCountry { code: "FR", currency: "EUR (€)", languages: &["French"], timezone: "UTC+01:00", neighbors: &["AD", "BE", "CH", "DE", "ES", "IT", "LU", "MC"] },
    BuiltinCountry { code: "IT", currency: "EUR (€)", languages: &["Italian"], timezone: "UTC+01:00", neighbors: &["AT", "CH", "FR", "SI", "SM", "VA"] },
    BuiltinCountry { code: "ES", currency: "EUR (€)", languages: &["Spanish"], timezone: "UTC+01:00", neighbors: &["AD", "FR", "GI", "PT", "MA"] },
    BuiltinCountry { code: "JP", currency: "JPY (¥)", languages: &["Japanese"], timezone: "UTC+09:00", neighbors: &[] },
    BuiltinCountry { code: "IN", currency: "INR (₹)", languages: &["Hindi", "English"], timezone: "UTC+05:30", neighbors: &["BD", "BT", "CN", "MM", "NP", "PK"] },
    BuiltinCountry { code: "BR", currency: "BRL (R$)", languages: &["Portuguese"], timezone: "UTC-03:00", neighbors: &["AR", "BO", "CO", "GF", "GY", "PE", "PY", "SR", "UY", "VE"] },
    BuiltinCountry { code: "CA", currency: "CAD ($)", languages: &["English", "French"], timezone: "UTC-05:00", neighbors: &["US"] },
    BuiltinCountry { code: "AU", currency: "AUD ($)", languages: &["English"], timezone: "UTC+10:00", neighbors: &[] },
    BuiltinCountry { code: "CN", currency: "CNY (¥)", languages: &["Chinese"], timezone: "UTC+08:00", neighbors: &["AF", "BT", "IN", "KP", "KZ", "LA", "MM", "MN", "NP", "PK", "RU", "VN"] },
];

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AD", "Andorra"), ("AF", "Afghanistan"), ("AR", "Argentina"), ("AT", "Austria"),
    ("AU", "Australia"), ("BD", "Bangladesh"), ("BE", "Belgium"), ("BO", "Bolivia"),
    ("BR", "Brazil"), ("BT", "Bhutan"), ("CA", "Canada"), ("CH", "Switzerland"),
    ("CN", "China"), ("CO", "Colombia"), ("CZ", "Czechia"), ("DE", "Germany"),
    ("DK", "Denmark"), ("ES", "Spain"), ("FR", "France"), ("GB", "United Kingdom"),
    ("GF", "French Guiana"), ("GI", "Gibraltar"), ("GY", "Guyana"), ("IE", "Ireland"),
    ("IN", "India"), ("IT", "Italy"), ("JP", "Japan"), ("KP", "North Korea"),
    ("KZ", "Kazakhstan"), ("LA", "Laos"), ("LU", "Luxembourg"), ("MA", "Morocco"),
    ("MC", "Monaco"), ("MM", "Myanmar"), ("MN", "Mongolia"), ("MX", "Mexico"),
    ("NL", "Netherlands"), ("NP", "Nepal"), ("PE", "Peru"), ("PK", "Pakistan"),
    ("PL", "Poland"), ("PT", "Portugal"), ("PY", "Paraguay"), ("RU", "Russia"),
    ("SI", "Slovenia"), ("SM", "San Marino"), ("SR", "Suriname"), ("US", "United States"),
    ("UY", "Uruguay"), ("VA", "Vatican City"), ("VE", "Venezuela"), ("VN", "Vietnam"),
];

/// Fallback currency and language table for common countries.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCountries;

impl CountryDirectory for BuiltinCountries {
    fn fetch_country_metadata(&self, country_code: &str) -> Result<CountryMetadata> {
        let code = country_code.trim().to_uppercase();
        let country = BUILTIN_COUNTRIES
            .iter()
            .find(|c| c.code == code)
            .ok_or_else(|| LocateError::NotFound(country_code.to_string()))?;

        Ok(CountryMetadata {
            currency: country.currency.to_string(),
            languages: country.languages.iter().map(|l| l.to_string()).collect(),
            timezone: country.timezone.to_string(),
            neighbor_codes: country.neighbors.iter().map(|n| n.to_string()).collect(),
        })
    }

    fn country_name(&self, country_code: &str) -> Option<String> {
        let code = country_code.trim().to_uppercase();
        COUNTRY_NAMES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| name.to_string())
    }
}

// ─── Datasets ───────────────────────────────────────────────────

/// (name, state, lat, lon)
type SampleRow = (&'static str, &'static str, f64, f64);

const ROCK_TOWNS: &[SampleRow] = &[
    ("Rockville", "Maryland", 39.0840, -77.1528),
    ("Rock Hill", "South Carolina", 34.9249, -81.0251),
    ("Little Rock", "Arkansas", 34.7465, -92.2896),
    ("Rockford", "Illinois", 42.2711, -89.0940),
    ("Rock Island", "Illinois", 41.5095, -90.5787),
    ("Rockport", "Texas", 28.0206, -97.0544),
    ("Round Rock", "Texas", 30.5083, -97.6789),
    ("Rockville", "Indiana", 39.7628, -87.2292),
    ("Rock Springs", "Wyoming", 41.5875, -109.2029),
    ("Rockport", "Maine", 44.1859, -69.0762),
    ("Rockville", "Connecticut", 41.8668, -72.4495),
    ("Castle Rock", "Colorado", 39.3722, -104.8561),
    ("Rocky Mount", "North Carolina", 35.9382, -77.7905),
    ("Rockwall", "Texas", 32.9312, -96.4597),
];

const SPRING_TOWNS: &[SampleRow] = &[
    ("Blue Springs", "Alabama", 31.66128, -85.50744),
    ("Blue Springs", "Missouri", 39.0170, -94.2816),
    ("Colorado Springs", "Colorado", 38.8339, -104.8214),
    ("Palm Springs", "California", 33.8303, -116.5453),
    ("Hot Springs", "Arkansas", 34.5037, -93.0552),
    ("Silver Spring", "Maryland", 38.9907, -77.0261),
    ("Springfield", "Illinois", 39.7817, -89.6501),
    ("Springfield", "Missouri", 37.2090, -93.2923),
    ("Springfield", "Massachusetts", 42.1015, -72.5898),
    ("Coral Springs", "Florida", 26.2712, -80.2706),
    ("Spring Hill", "Tennessee", 35.7512, -86.9300),
    ("Spring Hill", "Florida", 28.4769, -82.5255),
    ("Saratoga Springs", "New York", 43.0831, -73.7846),
    ("Glenwood Springs", "Colorado", 39.5505, -107.3248),
];

/// Embedded sample datasets for the two listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinDataset {
    Rock,
    Spring,
}

impl BuiltinDataset {
    fn rows(&self) -> &'static [SampleRow] {
        match self {
            Self::Rock => ROCK_TOWNS,
            Self::Spring => SPRING_TOWNS,
        }
    }
}

impl std::str::FromStr for BuiltinDataset {
    type Err = LocateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rock" => Ok(Self::Rock),
            "spring" => Ok(Self::Spring),
            _ => Err(LocateError::Dataset(format!("unknown built-in dataset '{s}'"))),
        }
    }
}

impl LocationDataset for BuiltinDataset {
    fn load_location_dataset(&self) -> Result<Vec<NamedLocation>> {
        self.rows()
            .iter()
            .map(|&(name, state, lat, lon)| NamedLocation::new(name, state, Coordinate::new(lat, lon)?, None))
            .collect()
    }
}

/// Flat JSON array of `{name, state, lat, lon, county}` records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDataset {
    path: PathBuf,
}

impl JsonDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocationDataset for JsonDataset {
    fn load_location_dataset(&self) -> Result<Vec<NamedLocation>> {
        let content = std::fs::read_to_string(&self.path)?;
        let records: Vec<NamedLocation> = serde_json::from_str(&content)
            .map_err(|e| LocateError::Dataset(format!("{}: {}", self.path.display(), e)))?;
        info!(path = %self.path.display(), records = records.len(), "loaded location dataset");
        Ok(records)
    }
}

/// Dataset picked at runtime: an embedded sample or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Builtin(BuiltinDataset),
    Json(JsonDataset),
}

impl LocationDataset for DatasetSource {
    fn load_location_dataset(&self) -> Result<Vec<NamedLocation>> {
        match self {
            Self::Builtin(builtin) => builtin.load_location_dataset(),
            Self::Json(file) => file.load_location_dataset(),
        }
    }
}

//! Route planner: slug or names → geocoded endpoints → distance report.
//!
//! Pair flow:  names → slug → geocode both → distance
//! Slug flow:  slug → decode → geocode destination (+ source, or origin) → distance
//!
//! Collaborator errors are returned unchanged. There are no retries and no
//! silent fallbacks; the caller decides what to show.

use tracing::{debug, info, warn};

use super::providers::{CountryDirectory, Geocoder, WeatherProvider};
use super::types::{CountryMetadata, Origin, Place, PlaceDetails, RouteEndpoint, RouteReport};
use crate::error::{LocateError, Result};
use crate::geo::{self, TravelEstimates};
use crate::slug::{self, DecodedSlug};

/// Label used when the route starts at a detected position.
pub const DETECTED_ORIGIN_LABEL: &str = "Your Location";
/// Label used when no position was available.
pub const DEFAULT_ORIGIN_LABEL: &str = "New York (default location)";
const DEFAULT_ORIGIN_DISPLAY: &str = "New York, New York, United States";

/// Builds [`RouteReport`]s on top of a [`Geocoder`].
pub struct RoutePlanner<G: Geocoder> {
    geocoder: G,
}

impl<G: Geocoder> RoutePlanner<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Route between two named places.
    pub fn plan_pair(&self, source_name: &str, dest_name: &str) -> Result<RouteReport> {
        let slug = slug::encode_pair(source_name, dest_name)?;
        let source = self.resolve(source_name.trim())?;
        let destination = self.resolve(dest_name.trim())?;
        Ok(self.report(slug, source, destination))
    }

    /// Route from the caller's position (or the default origin) to a named place.
    pub fn plan_from_origin(&self, dest_name: &str, origin: Origin) -> Result<RouteReport> {
        let slug = slug::encode_single(dest_name)?;
        let destination = self.resolve(dest_name.trim())?;
        Ok(self.report(slug, origin_endpoint(origin), destination))
    }

    /// Route described by a URL slug. `origin` is only used for `-from-me` slugs.
    pub fn plan_slug(&self, slug: &str, origin: Origin) -> Result<RouteReport> {
        let decoded = slug::decode(slug)?;
        debug!(slug, dest = %decoded.dest, source = ?decoded.source, "decoded slug");

        let destination = self.resolve(&slug::segment_to_query(&decoded.dest))?;
        let source = match &decoded.source {
            Some(segment) => self.resolve(&slug::segment_to_query(segment))?,
            None => origin_endpoint(origin),
        };
        Ok(self.report(DecodedSlug::encode(&decoded), source, destination))
    }

    /// Country facts, current weather and related-route links for a resolved place.
    ///
    /// An unknown country yields placeholder metadata and a failed weather
    /// lookup leaves `weather` empty; reverse geocoding errors propagate.
    /// Neighbors without a known name are linked by their ISO code.
    pub fn place_details(
        &self,
        place: &Place,
        countries: &dyn CountryDirectory,
        weather: Option<&dyn WeatherProvider>,
    ) -> Result<PlaceDetails> {
        let reverse = self.geocoder.reverse_geocode(place.coordinate)?;

        let country = match countries.fetch_country_metadata(&reverse.country_code) {
            Ok(meta) => meta,
            Err(LocateError::NotFound(code)) => {
                debug!(code = %code, "no country metadata");
                CountryMetadata::not_available()
            }
            Err(e) => return Err(e),
        };

        let weather = match weather.map(|provider| provider.fetch_weather(place.coordinate)) {
            Some(Ok(snapshot)) => Some(snapshot),
            Some(Err(e)) => {
                warn!(error = %e, "weather lookup failed");
                None
            }
            None => None,
        };

        let neighbor_names: Vec<String> = country
            .neighbor_codes
            .iter()
            .map(|code| countries.country_name(code).unwrap_or_else(|| code.clone()))
            .collect();
        let neighbor_routes = slug::related_routes(&place.display_name, &neighbor_names);
        let popular_routes = slug::related_routes(&place.display_name, &slug::POPULAR_ROUTE_CITIES[..]);

        Ok(PlaceDetails {
            display_name: reverse.display_name,
            country_code: reverse.country_code,
            country,
            weather,
            neighbor_routes,
            popular_routes,
        })
    }

    fn resolve(&self, query: &str) -> Result<RouteEndpoint> {
        let place = self.geocoder.geocode(query)?;
        Ok(RouteEndpoint {
            label: slug::title_case(query),
            display_name: place.display_name,
            coordinate: place.coordinate,
        })
    }

    fn report(&self, slug: String, source: RouteEndpoint, destination: RouteEndpoint) -> RouteReport {
        let distance = geo::distance(source.coordinate, destination.coordinate);
        let travel = TravelEstimates::from_km(distance.kilometers);
        info!(
            slug = %slug,
            from = %source.label,
            to = %destination.label,
            km = geo::round_for_display(distance.kilometers),
            "route planned"
        );
        RouteReport { slug, source, destination, distance, travel }
    }
}

fn origin_endpoint(origin: Origin) -> RouteEndpoint {
    match origin {
        Origin::Detected(coordinate) => RouteEndpoint {
            label: DETECTED_ORIGIN_LABEL.to_string(),
            display_name: coordinate.to_string(),
            coordinate,
        },
        Origin::Default => RouteEndpoint {
            label: DEFAULT_ORIGIN_LABEL.to_string(),
            display_name: DEFAULT_ORIGIN_DISPLAY.to_string(),
            coordinate: origin.coordinate(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::location::providers::{BuiltinCountries, BuiltinGazetteer};
    use crate::location::types::{ReverseGeocode, WeatherSnapshot};
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    struct StubGeocoder {
        places: HashMap<&'static str, (f64, f64)>,
    }

    impl StubGeocoder {
        fn new(entries: &[(&'static str, f64, f64)]) -> Self {
            Self { places: entries.iter().map(|&(n, lat, lon)| (n, (lat, lon))).collect() }
        }
    }

    impl Geocoder for StubGeocoder {
        fn geocode(&self, name: &str) -> Result<Place> {
            let &(lat, lon) = self
                .places
                .get(name.to_lowercase().as_str())
                .ok_or_else(|| LocateError::NotFound(name.to_string()))?;
            Ok(Place { coordinate: Coordinate::new(lat, lon)?, display_name: format!("{name}, Stubland") })
        }

        fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<ReverseGeocode> {
            Ok(ReverseGeocode { display_name: "Somewhere, Stubland".into(), country_code: "ZZ".into() })
        }
    }

    struct DownGeocoder;

    impl Geocoder for DownGeocoder {
        fn geocode(&self, _name: &str) -> Result<Place> {
            Err(LocateError::Unavailable("geocoder offline".into()))
        }

        fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<ReverseGeocode> {
            Err(LocateError::Unavailable("geocoder offline".into()))
        }
    }

    struct FixedWeather(Option<WeatherSnapshot>);

    impl WeatherProvider for FixedWeather {
        fn fetch_weather(&self, _coordinate: Coordinate) -> Result<WeatherSnapshot> {
            self.0.clone().ok_or_else(|| LocateError::Unavailable("weather".into()))
        }
    }

    fn sample_weather() -> WeatherSnapshot {
        WeatherSnapshot {
            condition: "clouds".into(),
            description: "overcast clouds".into(),
            temperature_c: 14.2,
            feels_like_c: 13.1,
            wind_speed_kmh: 18.0,
            humidity_pct: 77,
            sunrise: "2026-10-19T06:31:00Z".parse().unwrap(),
            sunset: "2026-10-19T16:55:00Z".parse().unwrap(),
            utc_offset_seconds: 3600,
        }
    }

    #[test]
    fn test_new_york_to_london() {
        let planner = RoutePlanner::new(BuiltinGazetteer);
        let report = planner.plan_pair("New York", "London").unwrap();

        assert_eq!(report.slug, "how-far-is-london-from-new-york");
        assert_eq!(report.source.label, "New York");
        assert_eq!(report.destination.label, "London");
        assert_relative_eq!(report.distance.kilometers, 5570.0, max_relative = 0.01);
        assert_relative_eq!(report.distance.miles, 3461.0, max_relative = 0.01);
        assert_relative_eq!(report.travel.flying_hours, report.distance.kilometers / 800.0);
    }

    #[test]
    fn test_plan_slug_matches_plan_pair() {
        let planner = RoutePlanner::new(BuiltinGazetteer);
        let from_slug = planner.plan_slug("how-far-is-london-from-new-york", Origin::Default).unwrap();
        let from_names = planner.plan_pair("new york", "london").unwrap();
        assert_eq!(from_slug, from_names);
    }

    #[test]
    fn test_plan_slug_self_relative_uses_origin() {
        let planner = RoutePlanner::new(StubGeocoder::new(&[("paris", 48.8566, 2.3522)]));
        let here = Coordinate::new(48.8566, 2.3522).unwrap();

        let report = planner.plan_slug("how-far-is-paris-from-me", Origin::Detected(here)).unwrap();
        assert_eq!(report.source.label, DETECTED_ORIGIN_LABEL);
        assert_eq!(report.destination.label, "Paris");
        assert_eq!(report.distance.kilometers, 0.0);

        let report = planner.plan_slug("how-far-is-paris-from-me", Origin::Default).unwrap();
        assert_eq!(report.source.label, DEFAULT_ORIGIN_LABEL);
        assert_eq!(report.source.coordinate, Coordinate::DEFAULT_ORIGIN);
        assert!(report.distance.kilometers > 5000.0);
    }

    #[test]
    fn test_multi_word_segments_become_queries() {
        let planner = RoutePlanner::new(StubGeocoder::new(&[
            ("rock hill", 34.9249, -81.0251),
            ("little rock", 34.7465, -92.2896),
        ]));
        let report = planner.plan_slug("how-far-is-rock-hill-from-little-rock", Origin::Default).unwrap();
        assert_eq!(report.destination.label, "Rock Hill");
        assert_eq!(report.source.label, "Little Rock");
        assert_eq!(report.destination.display_name, "rock hill, Stubland");
    }

    #[test]
    fn test_from_origin() {
        let planner = RoutePlanner::new(BuiltinGazetteer);
        let report = planner.plan_from_origin("Tokyo", Origin::Default).unwrap();
        assert_eq!(report.slug, "how-far-is-tokyo-from-me");
        assert!(report.distance.kilometers > 10_000.0);
    }

    #[test]
    fn test_errors_pass_through() {
        let planner = RoutePlanner::new(BuiltinGazetteer);
        assert!(matches!(
            planner.plan_slug("not-a-valid-slug", Origin::Default),
            Err(LocateError::MalformedSlug(_))
        ));
        assert!(matches!(
            planner.plan_slug("how-far-is-atlantis-from-me", Origin::Default),
            Err(LocateError::NotFound(q)) if q == "atlantis"
        ));
        assert!(matches!(planner.plan_pair("", "London"), Err(LocateError::EmptyName(_))));

        let down = RoutePlanner::new(DownGeocoder);
        assert!(matches!(
            down.plan_pair("New York", "London"),
            Err(LocateError::Unavailable(_))
        ));
    }

    #[test]
    fn test_place_details_with_weather() {
        let planner = RoutePlanner::new(BuiltinGazetteer);
        let place = planner.geocoder().geocode("Paris").unwrap();
        let weather: &dyn WeatherProvider = &FixedWeather(Some(sample_weather()));

        let details = planner.place_details(&place, &BuiltinCountries, Some(weather)).unwrap();
        assert_eq!(details.country_code, "FR");
        assert_eq!(details.country.currency, "EUR (€)");
        assert_eq!(details.weather.unwrap().humidity_pct, 77);

        let neighbor_slugs: Vec<&str> = details.neighbor_routes.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(neighbor_slugs.len(), 8);
        assert!(neighbor_slugs.contains(&"how-far-is-germany-from-paris"));
        assert!(neighbor_slugs.contains(&"how-far-is-andorra-from-paris"));
        assert_eq!(details.popular_routes.len(), 4);
        assert_eq!(details.popular_routes[2].slug, "how-far-is-tokyo-from-paris");
    }

    #[test]
    fn test_place_details_degrades() {
        let planner = RoutePlanner::new(StubGeocoder::new(&[("nowhere", 1.0, 1.0)]));
        let place = planner.geocoder().geocode("nowhere").unwrap();
        let weather: &dyn WeatherProvider = &FixedWeather(None);

        let details = planner.place_details(&place, &BuiltinCountries, Some(weather)).unwrap();
        assert_eq!(details.country, CountryMetadata::not_available());
        assert!(details.weather.is_none());
        assert!(details.neighbor_routes.is_empty());
        assert_eq!(details.popular_routes[0].slug, "how-far-is-new-york-from-nowhere");

        let down = RoutePlanner::new(DownGeocoder);
        assert!(matches!(
            down.place_details(&place, &BuiltinCountries, None),
            Err(LocateError::Unavailable(_))
        ));
    }
}

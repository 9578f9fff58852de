//! Places and routes: record types, collaborator ports with offline
//! implementations, and the route planner that ties them to the math.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{
    BuiltinCountries, BuiltinDataset, BuiltinGazetteer, CountryDirectory, DatasetSource, Geocoder,
    JsonDataset, LocationDataset, WeatherProvider,
};
pub use resolver::RoutePlanner;
pub use types::{
    CountryMetadata, NamedLocation, Origin, Place, PlaceDetails, ReverseGeocode, RouteEndpoint,
    RouteReport, WeatherSnapshot,
};

//! Great-circle distances between named places, "how far is X from Y" URL
//! slugs, and frequency statistics over location datasets.
//!
//! The math, slug and statistics modules are pure. Geocoding, weather and
//! country lookups go through the traits in [`location::providers`].

pub mod config;
pub mod error;
pub mod geo;
pub mod location;
pub mod logging;
pub mod slug;
pub mod stats;

pub use error::{LocateError, Result};
pub use geo::{Coordinate, DistanceResult, DistanceUnit, TravelEstimates};
pub use stats::AggregateStats;

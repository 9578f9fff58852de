//! Error taxonomy for the location engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocateError>;

/// Every failure the crate can report.
///
/// Core modules (`geo`, `slug`, `stats`) only produce the first three
/// variants. `NotFound` and `Unavailable` originate in collaborators and are
/// passed through untouched.
#[derive(Error, Debug)]
pub enum LocateError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("Invalid coordinate: lat {latitude}, lon {longitude} (lat: -90..90, lon: -180..180)")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Slug does not follow `how-far-is-<X>-from-<Y|me>`.
    #[error("Malformed slug: '{0}'")]
    MalformedSlug(String),

    /// Name normalizes to the empty string.
    #[error("Name is empty after normalization: '{0}'")]
    EmptyName(String),

    /// Geocoder (or other lookup) had no match.
    #[error("Location not found: '{0}'")]
    NotFound(String),

    /// Collaborator could not answer.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Dataset content could not be used.
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LocateError {
    /// Short message suitable for a terminal user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCoordinate { .. } => {
                "Invalid coordinates. Lat: -90..90, Lon: -180..180".to_string()
            }
            Self::MalformedSlug(slug) => format!(
                "'{slug}' is not a route. Expected how-far-is-<place>-from-<place> or how-far-is-<place>-from-me"
            ),
            Self::EmptyName(raw) => format!("'{raw}' does not contain any letters or digits"),
            Self::NotFound(query) => format!("Could not find '{query}'. Try a larger nearby city."),
            Self::Unavailable(_) => "External data is unavailable right now.".to_string(),
            Self::Dataset(_) | Self::Io(_) | Self::Json(_) => {
                "Could not read the location dataset. Check the file path and format.".to_string()
            }
            Self::Config(msg) => format!("Configuration error: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = LocateError::MalformedSlug("not-a-valid-slug".into());
        assert_eq!(err.to_string(), "Malformed slug: 'not-a-valid-slug'");

        let err = LocateError::InvalidCoordinate { latitude: 91.0, longitude: 0.0 };
        assert!(err.to_string().contains("lat 91"));
    }

    #[test]
    fn test_user_messages() {
        let err = LocateError::NotFound("Atlantis".into());
        assert!(err.user_message().contains("Atlantis"));

        let err = LocateError::EmptyName("!!!".into());
        assert!(err.user_message().contains("!!!"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LocateError = io_err.into();
        assert!(matches!(err, LocateError::Io(_)));
    }
}

use crate::domain::model::Coordinate;
use crate::domain::ports::LocationSource;
use crate::utils::error::{LocationFailure, MapError, Result};
use async_trait::async_trait;

/// A position known up front, or a fixed reason why there is none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticLocation {
    Known(Coordinate),
    Denied,
    Unsupported,
}

impl StaticLocation {
    /// `Unsupported` unless both halves are given.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Result<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok(Self::Known(Coordinate::checked(lat, lon)?)),
            (None, None) => Ok(Self::Unsupported),
            _ => Err(MapError::ConfigError {
                message: "--lat and --lon must be given together".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LocationSource for StaticLocation {
    async fn current_position(&self) -> Result<Coordinate> {
        match self {
            StaticLocation::Known(at) => Ok(*at),
            StaticLocation::Denied => Err(MapError::LocationUnavailable(LocationFailure::Denied)),
            StaticLocation::Unsupported => {
                Err(MapError::LocationUnavailable(LocationFailure::Unsupported))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(
            StaticLocation::from_parts(Some(51.5), Some(-0.1)).unwrap(),
            StaticLocation::Known(Coordinate::new(51.5, -0.1))
        );
        assert_eq!(
            StaticLocation::from_parts(None, None).unwrap(),
            StaticLocation::Unsupported
        );
        assert!(StaticLocation::from_parts(Some(51.5), None).is_err());
        assert!(StaticLocation::from_parts(Some(95.0), Some(0.0)).is_err());
    }

    #[tokio::test]
    async fn test_denied_reports_location_unavailable() {
        let err = StaticLocation::Denied.current_position().await.unwrap_err();
        assert!(matches!(
            err,
            MapError::LocationUnavailable(LocationFailure::Denied)
        ));
    }
}

use crate::domain::model::{Action, Notice, Phase};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(LocationFailure),

    #[error("Cannot {action} without a known location")]
    PreconditionMissing { action: Action },

    #[error("No {category} found within {radius_m} m")]
    NoPlacesFound { category: String, radius_m: u32 },

    #[error("No route between origin and destination")]
    NoRouteFound,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected response from {service}: {message}")]
    UnexpectedResponse { service: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid coordinate '{value}': {reason}")]
    InvalidCoordinate { value: String, reason: String },

    #[error("No selection prompt is open")]
    NoSelection,

    #[error("Option {index} does not exist ({available} available)")]
    SelectionOutOfRange { index: usize, available: usize },

    #[error("Cannot {action} while {phase}")]
    InvalidTransition { action: Action, phase: Phase },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, MapError>;

/// Why the device position could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFailure {
    Denied,
    Unsupported,
}

impl std::fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationFailure::Denied => write!(f, "access denied"),
            LocationFailure::Unsupported => write!(f, "geolocation not supported"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LocationUnavailable,
    PreconditionMissing,
    EmptyResult,
    TransportFailure,
    InvalidSelection,
    Configuration,
}

impl MapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MapError::LocationUnavailable(_) => ErrorKind::LocationUnavailable,
            MapError::PreconditionMissing { .. } | MapError::InvalidTransition { .. } => {
                ErrorKind::PreconditionMissing
            }
            MapError::NoPlacesFound { .. } | MapError::NoRouteFound => ErrorKind::EmptyResult,
            MapError::HttpError(_)
            | MapError::UnexpectedResponse { .. }
            | MapError::SerializationError(_)
            | MapError::IoError(_) => ErrorKind::TransportFailure,
            MapError::InvalidCoordinate { .. }
            | MapError::NoSelection
            | MapError::SelectionOutOfRange { .. } => ErrorKind::InvalidSelection,
            MapError::ConfigError { .. } | MapError::InvalidConfigValueError { .. } => {
                ErrorKind::Configuration
            }
        }
    }

    /// The notification shown to the user when `action` fails with this error.
    pub fn notice(&self, action: Action) -> Notice {
        match self {
            MapError::LocationUnavailable(LocationFailure::Denied) => Notice::LocationDenied,
            MapError::LocationUnavailable(LocationFailure::Unsupported) => {
                Notice::LocationUnsupported
            }
            MapError::PreconditionMissing { action } => Notice::LocationMissing(*action),
            MapError::InvalidTransition { action, phase } => Notice::NotNow {
                action: *action,
                phase: *phase,
            },
            MapError::NoPlacesFound { category, radius_m } => Notice::NoneFound {
                category: category.clone(),
                radius_m: *radius_m,
            },
            MapError::NoRouteFound => Notice::NoRoute,
            MapError::InvalidCoordinate { .. }
            | MapError::NoSelection
            | MapError::SelectionOutOfRange { .. } => Notice::InvalidSelection,
            _ => Notice::RequestFailed(action),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::EmptyResult => 0,
            ErrorKind::TransportFailure => 2,
            ErrorKind::Configuration => 3,
            _ => 1,
        }
    }
}

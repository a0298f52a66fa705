use crate::utils::error::MapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A WGS84 position. Rendered and parsed as `"lat,lon"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate, rejecting values that are not on Earth.
    pub fn checked(lat: f64, lon: f64) -> Result<Self, MapError> {
        let invalid = |reason: &str| MapError::InvalidCoordinate {
            value: format!("{},{}", lat, lon),
            reason: reason.to_string(),
        };

        if !lat.is_finite() || !lon.is_finite() {
            return Err(invalid("not a finite number"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("latitude must be between -90 and 90"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("longitude must be between -180 and 180"));
        }
        Ok(Self { lat, lon })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for Coordinate {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| MapError::InvalidCoordinate {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| invalid("expected 'lat,lon'"))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| invalid("latitude is not a number"))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| invalid("longitude is not a number"))?;

        Coordinate::checked(lat, lon).map_err(|e| match e {
            MapError::InvalidCoordinate { reason, .. } => invalid(&reason),
            other => other,
        })
    }
}

/// South-west / north-east corners of a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (mut sw, mut ne) = (first, first);
        for point in iter {
            sw.lat = sw.lat.min(point.lat);
            sw.lon = sw.lon.min(point.lon);
            ne.lat = ne.lat.max(point.lat);
            ne.lon = ne.lon.max(point.lon);
        }
        Some(Self {
            south_west: sw,
            north_east: ne,
        })
    }
}

/// Amenity tag searched for, with the glyph shown next to its markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCategory {
    pub tag: String,
    pub glyph: String,
}

impl PlaceCategory {
    pub fn new(tag: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            glyph: glyph.into(),
        }
    }

    pub fn hospital() -> Self {
        Self::new("hospital", "🏥")
    }

    pub fn police() -> Self {
        Self::new("police", "🚔")
    }

    /// Label used for places the geodata source left unnamed, e.g. `🏥 Hospital`.
    pub fn fallback_label(&self) -> String {
        let mut chars = self.tag.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("{} {}", self.glyph, capitalized)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub label: String,
    pub position: Coordinate,
    pub category: PlaceCategory,
}

impl Place {
    pub fn popup(&self) -> String {
        format!("{} {}", self.category.glyph, self.label)
    }
}

/// Handle for anything drawn on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Coordinate,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl Route {
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStyle {
    pub color: String,
    pub weight: u32,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            color: "blue".to_string(),
            weight: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOption {
    /// `"lat,lon"` of the place.
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorPrompt {
    pub title: String,
    pub options: Vec<SelectorOption>,
}

impl SelectorPrompt {
    pub fn for_places(category: &PlaceCategory, places: &[Place]) -> Self {
        Self {
            title: format!("Select a {} to navigate:", category.tag),
            options: places
                .iter()
                .map(|place| SelectorOption {
                    value: place.position.to_string(),
                    label: place.label.clone(),
                })
                .collect(),
        }
    }
}

/// Orchestrator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    LocationPending,
    LocationReady,
    LocationDenied,
    Searching,
    Selecting,
    Routing,
    RouteDisplayed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::LocationPending => "waiting for location",
            Phase::LocationReady => "location ready",
            Phase::LocationDenied => "location denied",
            Phase::Searching => "searching",
            Phase::Selecting => "selecting",
            Phase::Routing => "routing",
            Phase::RouteDisplayed => "showing a route",
        };
        f.write_str(name)
    }
}

/// User-triggered actions, used to word errors and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Locate,
    Alert,
    Search,
    Select,
    Route,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::Locate => "locate the device",
            Action::Alert => "send an alert",
            Action::Search => "search nearby places",
            Action::Select => "confirm a selection",
            Action::Route => "calculate a route",
        };
        f.write_str(verb)
    }
}

/// A blocking, user-visible message.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    LocationDenied,
    LocationUnsupported,
    LocationMissing(Action),
    NoneFound { category: String, radius_m: u32 },
    NoRoute,
    RequestFailed(Action),
    InvalidSelection,
    /// `action` was triggered in a phase that does not accept it.
    NotNow { action: Action, phase: Phase },
    RouteDisplayed { color: String },
    AlertSent { recipients: Vec<String> },
}

impl Notice {
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::RouteDisplayed { .. } | Notice::AlertSent { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LocationDenied => write!(
                f,
                "❌ Location access denied! Enable location to see nearby places."
            ),
            Notice::LocationUnsupported => {
                write!(f, "❌ Geolocation is not supported on this device.")
            }
            Notice::LocationMissing(Action::Route) => {
                write!(f, "❌ Cannot calculate route without location access.")
            }
            Notice::LocationMissing(Action::Alert) => {
                write!(f, "❌ Location not available! Enable location services.")
            }
            Notice::LocationMissing(_) => write!(
                f,
                "❌ Location not available! Please enable location services."
            ),
            Notice::NoneFound { category, radius_m } => write!(
                f,
                "❌ No nearby {}s found within {} km.",
                category,
                format_km(*radius_m)
            ),
            Notice::NoRoute => write!(f, "❌ No available route found."),
            Notice::RequestFailed(Action::Route) => {
                write!(f, "❌ Error calculating the route. Try again later.")
            }
            Notice::RequestFailed(Action::Search) => {
                write!(f, "❌ Error fetching nearby locations. Try again later.")
            }
            Notice::RequestFailed(action) => {
                write!(f, "❌ Could not {}. Try again later.", action)
            }
            Notice::InvalidSelection => {
                write!(f, "❌ That destination is not available. Search again.")
            }
            Notice::NotNow { action, phase } => {
                write!(f, "❌ Cannot {} while {}.", action, phase)
            }
            Notice::RouteDisplayed { color } => write!(
                f,
                "🚗 Route displayed! Follow the {} line to reach your destination.",
                color
            ),
            Notice::AlertSent { recipients } => write!(
                f,
                "🚨 SOS Activated! Live location sent to {} via WhatsApp.",
                recipients.join(" & ")
            ),
        }
    }
}

fn format_km(radius_m: u32) -> String {
    if radius_m % 1000 == 0 {
        (radius_m / 1000).to_string()
    } else {
        format!("{:.1}", f64::from(radius_m) / 1000.0)
    }
}

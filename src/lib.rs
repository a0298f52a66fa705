pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{
    console::{ConsoleLinks, ConsoleNotifier},
    geojson::GeoJsonMap,
    location::StaticLocation,
    osrm::OsrmClient,
    overpass::OverpassClient,
    storage::LocalStorage,
};
pub use crate::config::map_config::MapConfig;
pub use crate::core::orchestrator::{EmergencyMap, RouteOutcome, SearchOutcome, Services};
pub use crate::utils::error::{MapError, Result};

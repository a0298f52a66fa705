// Adapters layer: concrete implementations of the domain ports.

pub mod console;
pub mod geojson;
pub mod location;
pub mod osrm;
pub mod overpass;
pub mod storage;

pub mod alert;
pub mod orchestrator;
pub mod state;

pub use crate::domain::model::{Coordinate, Place, PlaceCategory, Route};
pub use crate::domain::ports::{
    LinkOpener, LocationSource, MapSurface, Notifier, PlaceSearch, RouteProvider, Storage,
};
pub use crate::utils::error::Result;

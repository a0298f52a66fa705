use crate::domain::model::{
    Bounds, Coordinate, LayerId, Marker, Notice, Place, PlaceCategory, Route, RouteStyle,
    SelectorPrompt,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Single-shot device position.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate>;
}

/// Points of interest of one category around a center.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(
        &self,
        category: &PlaceCategory,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<Place>>;
}

/// `Ok(None)` means the service answered but has no route.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Option<Route>>;
}

/// Drawing surface. Calls never fail; removing an unknown layer is a no-op.
pub trait MapSurface: Send + Sync {
    fn set_view(&self, center: Coordinate, zoom: u8);
    fn fit_bounds(&self, bounds: Bounds);
    fn add_marker(&self, marker: Marker) -> LayerId;
    fn draw_route(&self, route: &Route, style: &RouteStyle) -> LayerId;
    fn remove_layer(&self, id: LayerId);
    fn show_selector(&self, prompt: &SelectorPrompt);
    fn dismiss_selector(&self);
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Opens a deep link in an external application. Delivery is never confirmed.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str);
}

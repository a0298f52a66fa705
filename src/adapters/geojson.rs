use crate::domain::model::{Bounds, Coordinate, LayerId, Marker, Route, RouteStyle, SelectorPrompt};
use crate::domain::ports::MapSurface;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory map surface. Keeps what a renderer would show and exports it
/// as a GeoJSON `FeatureCollection`.
#[derive(Debug, Default)]
pub struct GeoJsonMap {
    layers: Mutex<Layers>,
}

#[derive(Debug, Default)]
struct Layers {
    next_id: u64,
    view: Option<(Coordinate, u8)>,
    fitted: Option<Bounds>,
    markers: BTreeMap<LayerId, Marker>,
    routes: BTreeMap<LayerId, (Route, RouteStyle)>,
    selector: Option<SelectorPrompt>,
}

impl Layers {
    fn allocate(&mut self) -> LayerId {
        self.next_id += 1;
        LayerId(self.next_id)
    }
}

impl GeoJsonMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn layers(&self) -> MutexGuard<'_, Layers> {
        self.layers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> Option<(Coordinate, u8)> {
        self.layers().view
    }

    pub fn fitted_bounds(&self) -> Option<Bounds> {
        self.layers().fitted
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.layers().markers.values().cloned().collect()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.layers()
            .routes
            .values()
            .map(|(route, _)| route.clone())
            .collect()
    }

    pub fn selector(&self) -> Option<SelectorPrompt> {
        self.layers().selector.clone()
    }

    pub fn to_geojson(&self) -> Value {
        let layers = self.layers();

        let markers = layers.markers.iter().map(|(id, marker)| {
            json!({
                "type": "Feature",
                "id": id.0,
                "geometry": {
                    "type": "Point",
                    "coordinates": [marker.position.lon, marker.position.lat],
                },
                "properties": { "popup": marker.popup },
            })
        });

        let routes = layers.routes.iter().map(|(id, (route, style))| {
            let coordinates: Vec<[f64; 2]> =
                route.path.iter().map(|point| [point.lon, point.lat]).collect();
            json!({
                "type": "Feature",
                "id": id.0,
                "geometry": { "type": "LineString", "coordinates": coordinates },
                "properties": {
                    "stroke": style.color,
                    "stroke-width": style.weight,
                    "distance_m": route.distance_m,
                    "duration_s": route.duration_s,
                },
            })
        });

        let features: Vec<Value> = markers.chain(routes).collect();
        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });

        if let Some(bounds) = layers.fitted {
            collection["bbox"] = json!([
                bounds.south_west.lon,
                bounds.south_west.lat,
                bounds.north_east.lon,
                bounds.north_east.lat,
            ]);
        }
        collection
    }
}

impl MapSurface for GeoJsonMap {
    fn set_view(&self, center: Coordinate, zoom: u8) {
        self.layers().view = Some((center, zoom));
    }

    fn fit_bounds(&self, bounds: Bounds) {
        self.layers().fitted = Some(bounds);
    }

    fn add_marker(&self, marker: Marker) -> LayerId {
        let mut layers = self.layers();
        let id = layers.allocate();
        layers.markers.insert(id, marker);
        id
    }

    fn draw_route(&self, route: &Route, style: &RouteStyle) -> LayerId {
        let mut layers = self.layers();
        let id = layers.allocate();
        layers.routes.insert(id, (route.clone(), style.clone()));
        id
    }

    fn remove_layer(&self, id: LayerId) {
        let mut layers = self.layers();
        if layers.markers.remove(&id).is_none() {
            layers.routes.remove(&id);
        }
    }

    fn show_selector(&self, prompt: &SelectorPrompt) {
        self.layers().selector = Some(prompt.clone());
    }

    fn dismiss_selector(&self) {
        self.layers().selector = None;
    }
}

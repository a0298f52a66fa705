use httpmock::prelude::*;
use rescue_map::adapters::overpass::overpass_query;
use rescue_map::domain::model::{Action, Coordinate, Notice, Phase, PlaceCategory};
use rescue_map::{
    ConsoleLinks, ConsoleNotifier, EmergencyMap, GeoJsonMap, MapConfig, MapError, OsrmClient,
    OverpassClient, RouteOutcome, SearchOutcome, Services, StaticLocation,
};
use std::sync::Arc;

struct App {
    app: EmergencyMap,
    map: Arc<GeoJsonMap>,
    notifier: Arc<ConsoleNotifier>,
}

fn app_against(server: &MockServer, location: StaticLocation) -> App {
    let mut config = MapConfig::default();
    config.services.overpass_endpoint = server.url("/api/interpreter");
    config.services.osrm_endpoint = server.base_url();

    let map = Arc::new(GeoJsonMap::new());
    let notifier = Arc::new(ConsoleNotifier::quiet());
    let services = Services {
        location: Arc::new(location),
        places: Arc::new(OverpassClient::new(config.services.overpass_endpoint.clone())),
        router: Arc::new(OsrmClient::new(
            config.services.osrm_endpoint.clone(),
            config.services.osrm_profile.clone(),
        )),
        map: map.clone(),
        notifier: notifier.clone(),
        links: Arc::new(ConsoleLinks::quiet()),
    };

    App {
        app: EmergencyMap::new(config, services),
        map,
        notifier,
    }
}

fn origin() -> Coordinate {
    Coordinate::new(51.50, -0.10)
}

fn place_markers(map: &GeoJsonMap) -> usize {
    map.markers()
        .iter()
        .filter(|marker| marker.popup != "📍 You are here")
        .count()
}

#[tokio::test]
async fn test_hospital_search_select_and_route() {
    let server = MockServer::start();

    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/interpreter")
            .query_param("data", overpass_query("hospital", origin(), 25_000));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "elements": [
                    {"type": "node", "id": 11, "lat": 51.4985, "lon": -0.1188,
                     "tags": {"amenity": "hospital", "name": "St Thomas' Hospital"}},
                    {"type": "node", "id": 12, "lat": 51.5033, "lon": -0.0866,
                     "tags": {"amenity": "hospital"}}
                ]
            }));
    });

    let route_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/route/v1/driving/-0.1,51.5;-0.0866,51.5033")
            .query_param("overview", "full")
            .query_param("geometries", "geojson");
        then.status(200).json_body(serde_json::json!({
            "code": "Ok",
            "routes": [{
                "geometry": {"type": "LineString",
                             "coordinates": [[-0.1, 51.5], [-0.095, 51.502], [-0.0866, 51.5033]]},
                "distance": 1180.0,
                "duration": 240.0
            }]
        }));
    });

    let App { app, map, notifier } = app_against(&server, StaticLocation::Known(origin()));
    app.start().await.unwrap();

    let outcome = app.find_nearby(&PlaceCategory::hospital()).await.unwrap();
    search_mock.assert();
    let SearchOutcome::Listed(places) = outcome else {
        panic!("search was superseded");
    };
    assert_eq!(places.len(), 2);
    assert_eq!(place_markers(&map), 2);

    let prompt = map.selector().unwrap();
    assert_eq!(prompt.options.len(), 2);
    assert_eq!(prompt.options[0].label, "St Thomas' Hospital");
    assert_eq!(prompt.options[1].label, "🏥 Hospital");
    assert!(map
        .markers()
        .iter()
        .any(|marker| marker.popup == "🏥 🏥 Hospital"));

    let outcome = app.confirm_selection(1).await.unwrap();
    route_mock.assert();

    let RouteOutcome::Displayed(route) = outcome else {
        panic!("route was superseded");
    };
    assert_eq!(route.path.len(), 3);
    assert_eq!(map.routes().len(), 1);
    assert_eq!(place_markers(&map), 2);
    assert!(map.selector().is_none());
    assert_eq!(app.phase(), Phase::RouteDisplayed);

    let bounds = map.fitted_bounds().unwrap();
    assert_eq!(bounds.south_west, Coordinate::new(51.5, -0.1));
    assert_eq!(bounds.north_east, Coordinate::new(51.5033, -0.0866));

    assert_eq!(
        notifier.history(),
        vec![Notice::RouteDisplayed {
            color: "blue".to_string()
        }]
    );

    let geojson = map.to_geojson();
    assert_eq!(geojson["features"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_no_police_nearby() {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET).path("/api/interpreter");
        then.status(200)
            .json_body(serde_json::json!({"version": 0.6, "elements": []}));
    });

    let App { app, map, notifier } = app_against(&server, StaticLocation::Known(origin()));
    app.start().await.unwrap();

    let err = app.find_nearby(&PlaceCategory::police()).await.unwrap_err();

    search_mock.assert();
    assert!(matches!(err, MapError::NoPlacesFound { .. }));
    assert_eq!(place_markers(&map), 0);
    assert!(map.selector().is_none());
    let history = notifier.history();
    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].to_string(),
        "❌ No nearby polices found within 25 km."
    );
}

#[tokio::test]
async fn test_search_server_error_then_retry() {
    let server = MockServer::start();
    let mut failing = server.mock(|when, then| {
        when.method(GET).path("/api/interpreter");
        then.status(429).body("rate limited");
    });

    let App { app, map, notifier } = app_against(&server, StaticLocation::Known(origin()));
    app.start().await.unwrap();

    let err = app.find_nearby(&PlaceCategory::hospital()).await.unwrap_err();
    failing.assert();
    assert!(matches!(err, MapError::UnexpectedResponse { .. }));
    assert_eq!(
        notifier.history(),
        vec![Notice::RequestFailed(Action::Search)]
    );
    assert_eq!(app.phase(), Phase::LocationReady);

    failing.delete();
    server.mock(|when, then| {
        when.method(GET).path("/api/interpreter");
        then.status(200).json_body(serde_json::json!({
            "elements": [{"lat": 51.51, "lon": -0.11, "tags": {"name": "Charing Cross"}}]
        }));
    });

    let outcome = app.find_nearby(&PlaceCategory::police()).await.unwrap();
    assert!(matches!(outcome, SearchOutcome::Listed(ref places) if places.len() == 1));
    assert_eq!(place_markers(&map), 1);
}

#[tokio::test]
async fn test_no_route_available() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path_contains("/route/v1/driving/");
        then.status(400).json_body(serde_json::json!({
            "code": "NoRoute",
            "message": "Impossible route between points"
        }));
    });

    let App { app, map, notifier } = app_against(&server, StaticLocation::Known(origin()));
    app.start().await.unwrap();

    let err = app
        .route_to(Coordinate::new(40.71, -74.0))
        .await
        .unwrap_err();

    assert!(matches!(err, MapError::NoRouteFound));
    assert!(map.routes().is_empty());
    assert_eq!(notifier.history(), vec![Notice::NoRoute]);
}

#[tokio::test]
async fn test_route_without_location_makes_no_request() {
    let server = MockServer::start();
    let route_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/route/v1/");
        then.status(200);
    });

    let App { app, notifier, .. } = app_against(&server, StaticLocation::Denied);
    assert!(app.start().await.is_err());

    let err = app
        .route_to(Coordinate::new(51.52, -0.12))
        .await
        .unwrap_err();

    assert!(matches!(err, MapError::PreconditionMissing { .. }));
    route_mock.assert_hits(0);
    let history = notifier.history();
    assert_eq!(
        history,
        vec![Notice::LocationDenied, Notice::LocationMissing(Action::Route)]
    );
    assert_eq!(
        history[1].to_string(),
        "❌ Cannot calculate route without location access."
    );
}

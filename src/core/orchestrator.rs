use crate::config::map_config::MapConfig;
use crate::core::alert::{self, AlertReport};
use crate::core::state::MapState;
use crate::domain::model::{
    Action, Coordinate, Marker, Notice, Phase, Place, PlaceCategory, Route, SelectorPrompt,
};
use crate::domain::ports::{LinkOpener, LocationSource, MapSurface, Notifier, PlaceSearch, RouteProvider};
use crate::utils::error::{MapError, Result};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The collaborators the orchestrator drives.
#[derive(Clone)]
pub struct Services {
    pub location: Arc<dyn LocationSource>,
    pub places: Arc<dyn PlaceSearch>,
    pub router: Arc<dyn RouteProvider>,
    pub map: Arc<dyn MapSurface>,
    pub notifier: Arc<dyn Notifier>,
    pub links: Arc<dyn LinkOpener>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Markers drawn and the selector opened, one option per place.
    Listed(Vec<Place>),
    /// A newer search or route request was issued while this one was in flight.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Displayed(Route),
    Superseded,
}

/// Sequences location, nearby search, selection, routing and alerts.
///
/// Every action takes `&self`, so actions triggered while another one awaits
/// a response run interleaved on the same task. Each search and route request
/// holds a ticket; a response arriving after a newer request was issued is
/// dropped instead of rendered.
pub struct EmergencyMap {
    config: MapConfig,
    services: Services,
    state: Mutex<MapState>,
}

impl EmergencyMap {
    pub fn new(config: MapConfig, services: Services) -> Self {
        services
            .map
            .set_view(config.map.initial_center, config.map.initial_zoom);
        Self {
            config,
            services,
            state: Mutex::new(MapState::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MapState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.state().origin
    }

    pub fn selector(&self) -> Option<SelectorPrompt> {
        self.state().selector.clone()
    }

    pub fn marker_count(&self) -> usize {
        self.state().markers.len()
    }

    pub fn has_route(&self) -> bool {
        self.state().route.is_some()
    }

    // Logs, shows the notice, hands the error back for `?`.
    fn report(&self, action: Action, err: MapError) -> MapError {
        tracing::warn!("❌ Failed to {}: {} ({:?})", action, err, err.kind());
        self.services.notifier.notify(&err.notice(action));
        err
    }

    /// Asks for the device position once. Only valid while idle.
    pub async fn start(&self) -> Result<Coordinate> {
        {
            let mut state = self.state();
            if state.phase != Phase::Idle {
                let err = MapError::InvalidTransition {
                    action: Action::Locate,
                    phase: state.phase,
                };
                drop(state);
                return Err(self.report(Action::Locate, err));
            }
            state.phase = Phase::LocationPending;
        }

        tracing::debug!("Requesting device position");
        let position = self.services.location.current_position().await;

        let mut state = self.state();
        match position {
            Ok(at) => {
                state.origin = Some(at);
                state.phase = Phase::LocationReady;
                self.services.map.set_view(at, self.config.map.user_zoom);
                self.services.map.add_marker(Marker {
                    position: at,
                    popup: "📍 You are here".to_string(),
                });
                tracing::info!("📍 Location acquired: {}", at);
                Ok(at)
            }
            Err(err) => {
                state.phase = Phase::LocationDenied;
                drop(state);
                Err(self.report(Action::Locate, err))
            }
        }
    }

    /// Clears the map, searches `category` around the user and lists the results.
    ///
    /// The map stays cleared when the search fails or finds nothing.
    pub async fn find_nearby(&self, category: &PlaceCategory) -> Result<SearchOutcome> {
        let radius_m = self.config.search.radius_m;

        let prepared = {
            let mut state = self.state();
            state.require_origin(Action::Search).map(|origin| {
                let ticket = state.issue_ticket();
                for layer in state.take_search_layers() {
                    self.services.map.remove_layer(layer);
                }
                if state.selector.take().is_some() {
                    self.services.map.dismiss_selector();
                }
                state.phase = Phase::Searching;
                (origin, ticket)
            })
        };
        let (origin, ticket) = prepared.map_err(|e| self.report(Action::Search, e))?;

        tracing::info!(
            "🔍 Searching {} within {} m of {}",
            category.tag,
            radius_m,
            origin
        );
        let result = self
            .services
            .places
            .search(category, origin, radius_m)
            .await;

        let mut state = self.state();
        if !state.is_current(ticket) {
            tracing::debug!("Discarding superseded {} search", category.tag);
            return Ok(SearchOutcome::Superseded);
        }

        let places = match result {
            Ok(places) if places.is_empty() => Err(MapError::NoPlacesFound {
                category: category.tag.clone(),
                radius_m,
            }),
            other => other,
        };
        let places = match places {
            Ok(places) => places,
            Err(err) => {
                state.recover();
                drop(state);
                return Err(self.report(Action::Search, err));
            }
        };

        for place in &places {
            let id = self.services.map.add_marker(Marker {
                position: place.position,
                popup: place.popup(),
            });
            state.markers.push(id);
        }

        let prompt = SelectorPrompt::for_places(category, &places);
        self.services.map.show_selector(&prompt);
        state.selector = Some(prompt);
        state.phase = Phase::Selecting;

        tracing::info!("Found {} {} place(s)", places.len(), category.tag);
        Ok(SearchOutcome::Listed(places))
    }

    /// Confirms option `index` of the open selector and routes to it.
    ///
    /// The selector is dismissed whatever happens next.
    pub async fn confirm_selection(&self, index: usize) -> Result<RouteOutcome> {
        let chosen = {
            let mut state = self.state();
            let prompt = state.selector.take();
            if prompt.is_some() {
                self.services.map.dismiss_selector();
            }
            let chosen = match prompt {
                None => Err(MapError::NoSelection),
                Some(prompt) => {
                    let available = prompt.options.len();
                    prompt
                        .options
                        .into_iter()
                        .nth(index)
                        .ok_or(MapError::SelectionOutOfRange { index, available })
                }
            };
            if chosen.is_err() {
                state.recover();
            }
            chosen
        };
        let option = chosen.map_err(|e| self.report(Action::Select, e))?;

        let destination = match option.value.parse::<Coordinate>() {
            Ok(destination) => destination,
            Err(err) => {
                self.state().recover();
                return Err(self.report(Action::Select, err));
            }
        };

        tracing::info!("Navigating to {} ({})", option.label, destination);
        self.route_to(destination).await
    }

    /// Closes the selector without a choice, e.g. when the input ends.
    ///
    /// The user sees the same notice as for an unusable choice.
    pub fn cancel_selection(&self) -> MapError {
        {
            let mut state = self.state();
            if state.selector.take().is_some() {
                self.services.map.dismiss_selector();
            }
            state.recover();
        }
        self.report(Action::Select, MapError::NoSelection)
    }

    /// Draws the route from the user to `destination`, replacing any previous route.
    pub async fn route_to(&self, destination: Coordinate) -> Result<RouteOutcome> {
        let prepared = {
            let mut state = self.state();
            state.require_origin(Action::Route).map(|origin| {
                let ticket = state.issue_ticket();
                state.phase = Phase::Routing;
                (origin, ticket)
            })
        };
        let (origin, ticket) = prepared.map_err(|e| self.report(Action::Route, e))?;

        let result = self.services.router.route(origin, destination).await;

        let mut state = self.state();
        if !state.is_current(ticket) {
            tracing::debug!("Discarding superseded route to {}", destination);
            return Ok(RouteOutcome::Superseded);
        }

        let route = match result.and_then(|route| route.ok_or(MapError::NoRouteFound)) {
            Ok(route) => route,
            Err(err) => {
                state.recover();
                drop(state);
                return Err(self.report(Action::Route, err));
            }
        };
        let Some(bounds) = route.bounds() else {
            state.recover();
            drop(state);
            return Err(self.report(Action::Route, MapError::NoRouteFound));
        };

        if let Some(previous) = state.route.take() {
            self.services.map.remove_layer(previous);
        }
        let style = self.config.map.route_style();
        state.route = Some(self.services.map.draw_route(&route, &style));
        self.services.map.fit_bounds(bounds);
        state.phase = Phase::RouteDisplayed;
        drop(state);

        tracing::info!(
            "🚗 Route displayed: {:.1} km, {:.0} min",
            route.distance_m / 1000.0,
            route.duration_s / 60.0
        );
        self.services
            .notifier
            .notify(&Notice::RouteDisplayed { color: style.color });
        Ok(RouteOutcome::Displayed(route))
    }

    /// Opens one messaging deep link per recipient with the user's map link.
    pub async fn send_alert(&self) -> Result<AlertReport> {
        let origin = self.state().require_origin(Action::Alert);
        let origin = origin.map_err(|e| self.report(Action::Alert, e))?;

        let (message, links) = alert::prepare(&self.config.alert, origin);
        for link in &links {
            self.services.links.open(link);
        }

        let recipients: Vec<String> = self
            .config
            .alert
            .recipients
            .iter()
            .map(|recipient| recipient.label.clone())
            .collect();
        tracing::info!("🚨 Alert dispatched to {}", recipients.join(", "));
        self.services
            .notifier
            .notify(&Notice::AlertSent { recipients });

        Ok(AlertReport {
            message,
            links,
            sent_at: Utc::now(),
        })
    }
}

use crate::domain::model::{Action, Coordinate, LayerId, Phase, SelectorPrompt};
use crate::utils::error::{MapError, Result};

/// Identifies one search or route request. Only the latest ticket may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Everything the orchestrator owns between events.
#[derive(Debug)]
pub struct MapState {
    pub phase: Phase,
    pub origin: Option<Coordinate>,
    pub markers: Vec<LayerId>,
    pub route: Option<LayerId>,
    pub selector: Option<SelectorPrompt>,
    generation: u64,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new()
    }
}

impl MapState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            origin: None,
            markers: Vec::new(),
            route: None,
            selector: None,
            generation: 0,
        }
    }

    pub fn require_origin(&self, action: Action) -> Result<Coordinate> {
        self.origin
            .ok_or(MapError::PreconditionMissing { action })
    }

    /// Invalidates every ticket handed out before this one.
    pub fn issue_ticket(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Takes the marker set and route layer, leaving the state empty.
    pub fn take_search_layers(&mut self) -> Vec<LayerId> {
        let mut layers = std::mem::take(&mut self.markers);
        layers.extend(self.route.take());
        layers
    }

    /// Back to a stable phase after a failed action.
    pub fn recover(&mut self) {
        if self.origin.is_some() {
            self.phase = Phase::LocationReady;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_invalidates_older() {
        let mut state = MapState::new();
        let first = state.issue_ticket();
        assert!(state.is_current(first));

        let second = state.issue_ticket();
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }

    #[test]
    fn test_take_search_layers_empties_state() {
        let mut state = MapState::new();
        state.markers = vec![LayerId(1), LayerId(2)];
        state.route = Some(LayerId(3));

        let layers = state.take_search_layers();
        assert_eq!(layers, vec![LayerId(1), LayerId(2), LayerId(3)]);
        assert!(state.markers.is_empty());
        assert!(state.route.is_none());
    }

    #[test]
    fn test_recover_requires_origin() {
        let mut state = MapState::new();
        state.phase = Phase::LocationDenied;
        state.recover();
        assert_eq!(state.phase, Phase::LocationDenied);

        state.origin = Some(Coordinate::new(51.5, -0.1));
        state.phase = Phase::Routing;
        state.recover();
        assert_eq!(state.phase, Phase::LocationReady);
    }

    #[test]
    fn test_require_origin() {
        let mut state = MapState::new();
        assert!(matches!(
            state.require_origin(Action::Alert),
            Err(MapError::PreconditionMissing {
                action: Action::Alert
            })
        ));

        state.origin = Some(Coordinate::new(1.0, 2.0));
        assert_eq!(
            state.require_origin(Action::Search).unwrap(),
            Coordinate::new(1.0, 2.0)
        );
    }
}

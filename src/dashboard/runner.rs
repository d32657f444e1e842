//! Async driver for the dashboard state
//!
//! Each effect runs as its own task against the backend and reports back
//! through a channel. Responses may complete in any order; the state drops
//! the ones that were superseded while in flight.

use super::state::{DashboardState, Effect, Event};
use crate::api::Backend;
use crate::geo::{load_boundaries, GeoSource};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

pub struct Dashboard {
    state: DashboardState,
    backend: Arc<dyn Backend>,
    facility_limit: Option<usize>,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    in_flight: usize,
}

impl Dashboard {
    pub fn new(state: DashboardState, backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            backend,
            facility_limit: None,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Facilities requested per region; the client default applies otherwise
    pub fn with_facility_limit(mut self, limit: usize) -> Self {
        self.facility_limit = Some(limit);
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Issue the initial region summary fetch
    pub fn start(&mut self) {
        let effects = self.state.start();
        self.spawn_all(effects);
    }

    /// Apply an event and start whatever requests it produces
    pub fn dispatch(&mut self, event: Event) {
        let effects = self.state.handle(event);
        self.spawn_all(effects);
    }

    /// Requests started but not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Wait for the next response and apply it.
    ///
    /// Returns false when nothing is in flight.
    pub async fn next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        let Some(event) = self.rx.recv().await else {
            return false;
        };
        self.in_flight -= 1;
        self.dispatch(event);
        true
    }

    /// Apply responses until no requests remain in flight
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    /// Load boundaries and apply the outcome
    pub async fn load_boundaries(&mut self, source: &GeoSource, filter_ghana: bool) {
        let result = load_boundaries(source, self.backend.as_ref(), filter_ghana)
            .await
            .map_err(|e| e.user_message());
        self.dispatch(Event::GeoLoaded(result));
    }

    fn spawn_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        debug!("Starting {:?}", effect);
        self.in_flight += 1;
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let limit = self.facility_limit;
        let aborted = failed(&effect, "Request aborted unexpectedly");
        tokio::spawn(async move {
            let request = tokio::spawn(async move { perform(backend.as_ref(), effect, limit).await });
            // A panicked request still answers its effect
            let event = match request.await {
                Ok(event) => event,
                Err(e) => {
                    error!("Dashboard request task failed: {}", e);
                    aborted
                }
            };
            // Receiver lives as long as the dashboard
            let _ = tx.send(event);
        });
    }
}

/// Failure event answering an effect
fn failed(effect: &Effect, message: &str) -> Event {
    match effect {
        Effect::FetchRegions { generation, .. } => Event::RegionsLoaded {
            generation: *generation,
            result: Err(message.to_string()),
        },
        Effect::FetchFacilities { generation, .. } => Event::FacilitiesLoaded {
            generation: *generation,
            result: Err(message.to_string()),
        },
    }
}

async fn perform(backend: &dyn Backend, effect: Effect, limit: Option<usize>) -> Event {
    match effect {
        Effect::FetchRegions {
            generation,
            capability,
        } => Event::RegionsLoaded {
            generation,
            result: backend
                .region_summary(capability)
                .await
                .map_err(|e| e.user_message()),
        },
        Effect::FetchFacilities {
            generation,
            capability,
            region,
        } => Event::FacilitiesLoaded {
            generation,
            result: backend
                .facilities(capability, &region, limit)
                .await
                .map_err(|e| e.user_message()),
        },
    }
}

//! Dashboard state transitions
//!
//! Events come from the user (capability picked, polygon clicked) or from
//! completed requests. Handling an event mutates state and returns the
//! requests to issue next. Every request carries the generation of the
//! panel that issued it; a response whose generation is no longer current
//! was superseded and is dropped.

use crate::api::{Capability, Facility};
use crate::geo::{Boundaries, ChoroplethLayer};
use crate::metrics::METRICS;
use crate::reconcile::{Reconciler, RegionKey, RegionSummary};
use geojson::FeatureCollection;
use tracing::{debug, info};

/// Inputs to the dashboard
#[derive(Debug, Clone)]
pub enum Event {
    CapabilityChanged(Capability),
    RegionsLoaded {
        generation: u64,
        result: Result<Vec<RegionSummary>, String>,
    },
    PolygonClicked(RegionKey),
    FacilitiesLoaded {
        generation: u64,
        result: Result<Vec<Facility>, String>,
    },
    GeoLoaded(Result<Boundaries, String>),
}

/// Requests the dashboard wants issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchRegions {
        generation: u64,
        capability: Capability,
    },
    FetchFacilities {
        generation: u64,
        capability: Capability,
        region: String,
    },
}

/// One independently degrading panel
#[derive(Debug, Clone, Default)]
pub struct Panel<T> {
    pub data: T,
    pub loading: bool,
    /// User-facing message from the last failed load
    pub error: Option<String>,
    generation: u64,
}

impl<T: Default> Panel<T> {
    /// Start a new load, superseding any in flight
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Invalidate in-flight loads without starting a new one
    fn cancel(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    fn settle(&mut self, result: Result<T, String>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
            }
            Err(message) => {
                self.data = T::default();
                self.error = Some(message);
            }
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Dashboard view state
#[derive(Debug, Clone)]
pub struct DashboardState {
    reconciler: Reconciler,
    capability: Capability,
    regions: Panel<Vec<RegionSummary>>,
    facilities: Panel<Vec<Facility>>,
    selected_region: Option<String>,
    boundaries: Option<FeatureCollection>,
    geo_error: Option<String>,
}

impl DashboardState {
    pub fn new(reconciler: Reconciler, capability: Capability) -> Self {
        Self {
            reconciler,
            capability,
            regions: Panel::default(),
            facilities: Panel::default(),
            selected_region: None,
            boundaries: None,
            geo_error: None,
        }
    }

    /// Effects to issue when the dashboard first opens
    pub fn start(&mut self) -> Vec<Effect> {
        self.handle(Event::CapabilityChanged(self.capability))
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::CapabilityChanged(capability) => self.on_capability_changed(capability),
            Event::RegionsLoaded { generation, result } => {
                if !self.regions.is_current(generation) {
                    debug!("Dropping stale region summary (generation {})", generation);
                    METRICS.record_stale("regions");
                    return Vec::new();
                }
                if let Ok(records) = &result {
                    info!("Loaded {} region summaries for {}", records.len(), self.capability);
                }
                self.regions.settle(result);
                Vec::new()
            }
            Event::PolygonClicked(key) => self.on_polygon_clicked(&key),
            Event::FacilitiesLoaded { generation, result } => {
                if !self.facilities.is_current(generation) {
                    debug!("Dropping stale facility list (generation {})", generation);
                    METRICS.record_stale("facilities");
                    return Vec::new();
                }
                self.facilities.settle(result);
                Vec::new()
            }
            Event::GeoLoaded(result) => {
                match result {
                    Ok(boundaries) if boundaries.collection.features.is_empty() => {
                        self.boundaries = Some(boundaries.collection);
                        self.geo_error = Some(
                            "Boundaries loaded but no Ghana features remained after filtering"
                                .to_string(),
                        );
                    }
                    Ok(boundaries) => {
                        self.boundaries = Some(boundaries.collection);
                        self.geo_error = None;
                    }
                    Err(message) => {
                        self.boundaries = None;
                        self.geo_error = Some(format!("Boundary load failed: {}", message));
                    }
                }
                Vec::new()
            }
        }
    }

    fn on_capability_changed(&mut self, capability: Capability) -> Vec<Effect> {
        self.capability = capability;
        let mut effects = vec![Effect::FetchRegions {
            generation: self.regions.begin(),
            capability,
        }];

        // Facilities fetched for the previous capability are no longer relevant
        match self.selected_region.clone() {
            Some(region) => effects.push(Effect::FetchFacilities {
                generation: self.facilities.begin(),
                capability,
                region,
            }),
            None => self.facilities.cancel(),
        }

        effects
    }

    fn on_polygon_clicked(&mut self, key: &RegionKey) -> Vec<Effect> {
        let Some(record) = self.reconciler.resolve_click_target(key, &self.regions.data) else {
            debug!("Click on '{}' resolved to no region; nothing to fetch", key);
            METRICS.ignored_clicks.inc();
            return Vec::new();
        };

        let region = record.region.clone();
        self.selected_region = Some(region.clone());
        vec![Effect::FetchFacilities {
            generation: self.facilities.begin(),
            capability: self.capability,
            region,
        }]
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn regions(&self) -> &Panel<Vec<RegionSummary>> {
        &self.regions
    }

    pub fn facilities(&self) -> &Panel<Vec<Facility>> {
        &self.facilities
    }

    pub fn selected_region(&self) -> Option<&str> {
        self.selected_region.as_deref()
    }

    pub fn boundaries(&self) -> Option<&FeatureCollection> {
        self.boundaries.as_ref()
    }

    pub fn geo_error(&self) -> Option<&str> {
        self.geo_error.as_deref()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Choropleth view for the current boundaries and summaries
    pub fn layer(&self) -> Option<ChoroplethLayer> {
        self.boundaries.as_ref().map(|collection| {
            ChoroplethLayer::build(
                &collection.features,
                &self.regions.data,
                &self.reconciler,
                self.selected_region.as_deref(),
            )
        })
    }
}

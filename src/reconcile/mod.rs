//! Region reconciliation
//!
//! Region names arrive from two independent sources: the readiness backend's
//! summary records and the administrative boundary file. Boundary polygons
//! are keyed by their normalized name; summary records are normalized and
//! then folded onto those keys through a static alias table. Also here:
//! - count aggregation and status derivation per canonical region
//! - click resolution and polygon styling

pub mod aggregate;
pub mod aliases;
pub mod models;
pub mod normalize;
pub mod style;

pub use aggregate::{aggregate, resolve_click_target, Aggregation};
pub use aliases::{AliasError, AliasTable};
pub use models::{AggregatedRegion, ReadinessCounts, RegionStatus, RegionSummary};
pub use normalize::{normalize, RegionKey};
pub use style::{legend, status_color, style_for, PolygonStyle, NEUTRAL_FILL};

use std::sync::Arc;

/// Reconciler bound to one alias table
#[derive(Debug, Clone)]
pub struct Reconciler {
    aliases: Arc<AliasTable>,
}

impl Reconciler {
    pub fn new(aliases: AliasTable) -> Self {
        Self {
            aliases: Arc::new(aliases),
        }
    }

    /// Reconciler over the alias table shipped with the crate
    pub fn builtin() -> Result<Self, AliasError> {
        Ok(Self::new(AliasTable::builtin()?))
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn normalize(&self, name: &str) -> RegionKey {
        normalize(name)
    }

    pub fn canonicalize(&self, key: &RegionKey) -> RegionKey {
        self.aliases.canonicalize(key)
    }

    /// Key of a boundary polygon. The alias table only describes backend
    /// labels, so polygon names are normalized and never aliased.
    pub fn polygon_key(&self, name: &str) -> RegionKey {
        normalize(name)
    }

    /// Canonical key for a raw region name
    pub fn canonical_key(&self, name: &str) -> RegionKey {
        self.aliases.canonical_key(name)
    }

    pub fn aggregate(&self, records: &[RegionSummary]) -> Aggregation {
        aggregate(records, &self.aliases)
    }

    pub fn resolve_click_target<'a>(
        &self,
        key: &RegionKey,
        records: &'a [RegionSummary],
    ) -> Option<&'a RegionSummary> {
        resolve_click_target(key, records, &self.aliases)
    }

    /// Style a polygon given the selected region's raw name.
    ///
    /// The selection is canonicalized, so a region chosen through an aliased
    /// record ("Techiman Municipal") highlights the polygon it came from.
    pub fn style_for(
        &self,
        key: &RegionKey,
        aggregation: &Aggregation,
        selected_region: Option<&str>,
    ) -> PolygonStyle {
        let selected = selected_region.map(|name| self.canonical_key(name));
        style_for(key, aggregation, selected.as_ref())
    }
}

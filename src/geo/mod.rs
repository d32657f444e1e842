//! Administrative boundary handling
//!
//! Parses ADM1 boundary collections, pulls a region name out of each
//! feature and builds the choropleth view model from reconciled summaries.

pub mod features;
pub mod layer;
pub mod source;

pub use features::{feature_region_name, is_ghana_feature, parse_boundaries, retain_ghana};
pub use layer::{ChoroplethLayer, PolygonView};
pub use source::{load_boundaries, Boundaries, GeoSource};

/// Boundary data errors
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("Invalid GeoJSON: {0}")]
    Parse(String),

    #[error("Expected a FeatureCollection, found a {0}")]
    NotACollection(&'static str),
}

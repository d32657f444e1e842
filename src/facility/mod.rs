//! Facility placement

pub mod locate;

pub use locate::{find_facility_coords, region_centroid, Coords, FacilityLocator};

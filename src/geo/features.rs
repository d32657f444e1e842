//! Boundary file parsing and feature property lookup

use super::GeoError;
use geojson::{Feature, FeatureCollection, GeoJson};
use tracing::{debug, warn};

/// Properties that may carry a region name, in lookup order. Natural Earth
/// files use `name`/`name_en`, geoBoundaries uses `shapeName`.
const NAME_PROPERTIES: [&str; 6] = [
    "region_name",
    "name",
    "name_en",
    "name_local",
    "shapeName",
    "ADM1_NAME",
];

/// Country-identifying properties and the values that mean Ghana
const COUNTRY_PROPERTIES: [(&str, &str); 4] = [
    ("adm0_a3", "GHA"),
    ("admin", "Ghana"),
    ("iso_a2", "GH"),
    ("shapeGroup", "GHA"),
];

/// Parse a GeoJSON document that must be a FeatureCollection
pub fn parse_boundaries(text: &str) -> Result<FeatureCollection, GeoError> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| GeoError::Parse(e.to_string()))?;

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            debug!("Parsed {} boundary features", collection.features.len());
            Ok(collection)
        }
        GeoJson::Feature(_) => Err(GeoError::NotACollection("Feature")),
        GeoJson::Geometry(_) => Err(GeoError::NotACollection("Geometry")),
    }
}

fn string_property<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature
        .property(key)
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Region name carried by a feature, if any
pub fn feature_region_name(feature: &Feature) -> Option<String> {
    NAME_PROPERTIES
        .iter()
        .find_map(|key| string_property(feature, key))
        .map(str::to_string)
}

/// True when any country property identifies the feature as Ghanaian
pub fn is_ghana_feature(feature: &Feature) -> bool {
    COUNTRY_PROPERTIES
        .iter()
        .any(|(key, expected)| string_property(feature, key) == Some(*expected))
}

fn has_country_properties(feature: &Feature) -> bool {
    COUNTRY_PROPERTIES
        .iter()
        .any(|(key, _)| feature.contains_property(key))
}

/// Drop features that belong to another country. Features with no country
/// properties at all (single-country files) are kept. Returns the number of
/// features removed.
pub fn retain_ghana(collection: &mut FeatureCollection) -> usize {
    let before = collection.features.len();
    collection
        .features
        .retain(|feature| is_ghana_feature(feature) || !has_country_properties(feature));
    let dropped = before - collection.features.len();

    if collection.features.is_empty() && before > 0 {
        warn!("All {} boundary features were filtered out as non-Ghanaian", before);
    } else if dropped > 0 {
        debug!("Filtered out {} non-Ghanaian features", dropped);
    }

    dropped
}

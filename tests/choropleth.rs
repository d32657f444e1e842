//! Choropleth layer built from a boundary file and summary records

use readiness_atlas::api::{ApiConfig, BackendClient};
use readiness_atlas::config::Config;
use readiness_atlas::geo::{load_boundaries, ChoroplethLayer, GeoSource};
use readiness_atlas::reconcile::{
    normalize, AliasTable, ReadinessCounts, Reconciler, RegionStatus, RegionSummary, NEUTRAL_FILL,
};
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/ghana_adm1_sample.geojson")
}

fn record(region: &str, ready: u64, fragile: u64, absent: u64) -> RegionSummary {
    RegionSummary {
        region: region.to_string(),
        // Deliberately wrong; status is derived from counts
        status: RegionStatus::Desert,
        counts: ReadinessCounts::new(ready, fragile, absent, ready + fragile + absent),
    }
}

fn records() -> Vec<RegionSummary> {
    vec![
        record("Greater Accra", 8, 1, 1),
        record("Techiman Municipal", 1, 1, 0),
        record("Accra North", 1, 0, 1),
        record("Takoradi", 0, 0, 3),
        record("Asokwa Kumasi", 2, 2, 2),
        record("Sissala West District", 0, 1, 1),
    ]
}

async fn layer(selected: Option<&str>) -> ChoroplethLayer {
    let backend = BackendClient::new(ApiConfig::default()).unwrap();
    let boundaries = load_boundaries(&GeoSource::File(fixture()), &backend, true)
        .await
        .unwrap();
    assert_eq!(boundaries.dropped, 1);

    ChoroplethLayer::build(
        &boundaries.collection.features,
        &records(),
        &Reconciler::builtin().unwrap(),
        selected,
    )
}

#[tokio::test]
async fn test_polygons_reconcile_through_aliases() {
    let layer = layer(None).await;
    assert_eq!(layer.polygons.len(), 7);

    let accra = layer.polygon(&normalize("greateraccra")).unwrap();
    let region = accra.region.as_ref().unwrap();
    assert_eq!(region.counts.total, 12);
    assert_eq!(region.sources, 2);
    assert_eq!(region.status, RegionStatus::Resilient);
    assert_eq!(accra.click_target.as_deref(), Some("Greater Accra"));

    let bono = layer.polygon(&normalize("bono")).unwrap();
    assert_eq!(bono.tooltip, "Bono\nStatus: fragile\nReady: 1 / 2");
    assert_eq!(bono.click_target.as_deref(), Some("Techiman Municipal"));

    let western = layer.polygon(&normalize("western")).unwrap();
    assert_eq!(western.name.as_deref(), Some("Western"));
    assert_eq!(western.region.as_ref().unwrap().status, RegionStatus::Desert);
    assert_eq!(western.click_target.as_deref(), Some("Takoradi"));
}

#[tokio::test]
async fn test_polygon_names_are_not_aliased() {
    let layer = layer(Some("Takoradi")).await;

    // "Western North" is a backend label for western, but the polygon of
    // that name is its own region
    let western_north = layer.polygon(&normalize("Western North")).unwrap();
    assert_eq!(western_north.name.as_deref(), Some("Western North"));
    assert!(western_north.region.is_none());
    assert!(western_north.click_target.is_none());
    assert_eq!(western_north.style.fill_color, NEUTRAL_FILL);
    assert_eq!(western_north.style.border_weight, 1);

    let western = layer.polygon(&normalize("Western")).unwrap();
    assert_eq!(western.style.border_weight, 3);
}

#[tokio::test]
async fn test_unmatched_polygons_are_neutral_and_inert() {
    let layer = layer(None).await;

    let unmatched: Vec<&str> = layer
        .unmatched_polygons()
        .filter_map(|p| p.name.as_deref())
        .collect();
    assert_eq!(unmatched, vec!["Bono East", "Western North", "Volta"]);

    for polygon in layer.unmatched_polygons() {
        assert_eq!(polygon.style.fill_color, NEUTRAL_FILL);
        assert!(polygon.click_target.is_none());
        assert!(polygon.tooltip.ends_with("No data"));
    }

    assert_eq!(layer.orphan_regions, vec![normalize("upperwest")]);
}

#[tokio::test]
async fn test_selection_highlights_reconciled_polygon() {
    let layer = layer(Some("Techiman Municipal")).await;

    let highlighted: Vec<&str> = layer
        .polygons
        .iter()
        .filter(|p| p.style.border_weight == 3)
        .filter_map(|p| p.name.as_deref())
        .collect();
    assert_eq!(highlighted, vec!["Bono"]);
}

#[test]
fn test_configured_alias_file_matches_builtin() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/region_aliases.toml");
    let config = Config::from_toml_str(&format!(
        "[reconciler]\nalias_file = \"{}\"\n",
        path.display()
    ))
    .unwrap();

    let from_file = config.reconciler.load_aliases().unwrap();
    let builtin = AliasTable::builtin().unwrap();
    assert_eq!(from_file.len(), builtin.len());
    assert_eq!(from_file.canonical_key("Brong Ahafo"), normalize("bono"));
}

//! Choropleth view model: one entry per boundary polygon

use super::features::feature_region_name;
use crate::metrics::METRICS;
use crate::reconcile::{
    legend, AggregatedRegion, Aggregation, PolygonStyle, Reconciler, RegionKey, RegionStatus,
    RegionSummary,
};
use geojson::Feature;
use serde::Serialize;
use tracing::debug;

/// Everything a map widget needs to paint and wire up one polygon
#[derive(Debug, Clone, Serialize)]
pub struct PolygonView {
    /// Region name as written in the boundary file
    pub name: Option<String>,
    /// Normalized polygon name; empty when the feature has no name
    pub key: RegionKey,
    pub region: Option<AggregatedRegion>,
    pub style: PolygonStyle,
    pub tooltip: String,
    /// Region name to request facilities for when the polygon is clicked.
    /// `None` for polygons with no matching summary record: the click is
    /// accepted but no facility fetch is issued.
    pub click_target: Option<String>,
}

impl PolygonView {
    pub fn is_matched(&self) -> bool {
        self.region.is_some()
    }
}

/// Styled polygons plus bookkeeping about what did not reconcile
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethLayer {
    pub polygons: Vec<PolygonView>,
    /// Aggregated regions that no polygon claimed
    pub orphan_regions: Vec<RegionKey>,
    pub legend: Vec<(RegionStatus, &'static str)>,
}

impl ChoroplethLayer {
    /// Reconcile boundary features against summary records
    pub fn build(
        features: &[Feature],
        records: &[RegionSummary],
        reconciler: &Reconciler,
        selected_region: Option<&str>,
    ) -> Self {
        let aggregation = reconciler.aggregate(records);

        let polygons: Vec<PolygonView> = features
            .iter()
            .map(|feature| polygon_view(feature, records, &aggregation, reconciler, selected_region))
            .collect();

        let orphan_regions: Vec<RegionKey> = aggregation
            .keys()
            .filter(|key| !polygons.iter().any(|polygon| &polygon.key == *key))
            .cloned()
            .collect();

        let unmatched = polygons.iter().filter(|p| !p.is_matched()).count();
        METRICS.record_unmatched_polygons(unmatched);
        debug!(
            "Built choropleth: {} polygons, {} without data, {} orphan regions",
            polygons.len(),
            unmatched,
            orphan_regions.len()
        );

        Self {
            polygons,
            orphan_regions,
            legend: legend(),
        }
    }

    /// Polygons with no matching summary data
    pub fn unmatched_polygons(&self) -> impl Iterator<Item = &PolygonView> {
        self.polygons.iter().filter(|polygon| !polygon.is_matched())
    }

    /// Polygon for a normalized polygon name
    pub fn polygon(&self, key: &RegionKey) -> Option<&PolygonView> {
        self.polygons.iter().find(|polygon| &polygon.key == key)
    }
}

fn polygon_view(
    feature: &Feature,
    records: &[RegionSummary],
    aggregation: &Aggregation,
    reconciler: &Reconciler,
    selected_region: Option<&str>,
) -> PolygonView {
    if feature.properties.is_none() {
        return PolygonView {
            name: None,
            key: RegionKey::default(),
            region: None,
            style: PolygonStyle::unlabeled(),
            tooltip: "Unknown".to_string(),
            click_target: None,
        };
    }

    let name = feature_region_name(feature);
    let key = name
        .as_deref()
        .map(|name| reconciler.polygon_key(name))
        .unwrap_or_default();
    let region = aggregation.get(&key).cloned();
    let style = reconciler.style_for(&key, aggregation, selected_region);
    let click_target = reconciler
        .resolve_click_target(&key, records)
        .map(|record| record.region.clone());

    let label = name.as_deref().unwrap_or("Unknown");
    let tooltip = match &region {
        Some(region) => format!(
            "{}\nStatus: {}\nReady: {} / {}",
            label, region.status, region.counts.ready, region.counts.total
        ),
        None => format!("{}\nNo data", label),
    };

    PolygonView {
        name,
        key,
        region,
        style,
        tooltip,
        click_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::parse_boundaries;
    use crate::reconcile::{normalize, ReadinessCounts, NEUTRAL_FILL};

    fn features() -> Vec<Feature> {
        parse_boundaries(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": null, "properties": {"shapeName": "Bono Region"}},
                {"type": "Feature", "geometry": null, "properties": {"shapeName": "Bono East Region"}},
                {"type": "Feature", "geometry": null, "properties": null}
            ]}"#,
        )
        .unwrap()
        .features
    }

    fn records() -> Vec<RegionSummary> {
        vec![
            RegionSummary {
                region: "Techiman Municipal".to_string(),
                status: RegionStatus::Fragile,
                counts: ReadinessCounts::new(1, 1, 0, 2),
            },
            RegionSummary {
                region: "Upper West".to_string(),
                status: RegionStatus::Desert,
                counts: ReadinessCounts::new(0, 0, 3, 3),
            },
        ]
    }

    #[test]
    fn test_build_layer() {
        let reconciler = Reconciler::builtin().unwrap();
        let layer = ChoroplethLayer::build(&features(), &records(), &reconciler, None);

        assert_eq!(layer.polygons.len(), 3);

        let bono = &layer.polygons[0];
        assert_eq!(bono.key.as_str(), "bono");
        assert_eq!(bono.click_target.as_deref(), Some("Techiman Municipal"));
        assert_eq!(bono.style.fill_color, "#f59e0b");
        assert_eq!(bono.tooltip, "Bono Region\nStatus: fragile\nReady: 1 / 2");

        let bono_east = &layer.polygons[1];
        assert_eq!(bono_east.key.as_str(), "bonoeast");
        assert!(bono_east.click_target.is_none());
        assert_eq!(bono_east.style.fill_color, NEUTRAL_FILL);
        assert_eq!(bono_east.tooltip, "Bono East Region\nNo data");

        let unlabeled = &layer.polygons[2];
        assert_eq!(unlabeled.style, PolygonStyle::unlabeled());

        assert_eq!(layer.orphan_regions.len(), 1);
        assert_eq!(layer.orphan_regions[0].as_str(), "upperwest");
        assert_eq!(layer.unmatched_polygons().count(), 2);
    }

    #[test]
    fn test_selected_polygon() {
        let reconciler = Reconciler::builtin().unwrap();
        let layer =
            ChoroplethLayer::build(&features(), &records(), &reconciler, Some("Techiman Municipal"));
        let bono = layer.polygon(&reconciler.polygon_key("Bono")).unwrap();
        assert_eq!(bono.style.border_weight, 3);
        assert_eq!(layer.polygons[1].style.border_weight, 1);
    }

    #[test]
    fn test_polygon_keys_skip_alias_table() {
        let features = parse_boundaries(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": null, "properties": {"shapeName": "Western"}},
                {"type": "Feature", "geometry": null, "properties": {"shapeName": "Western North"}},
                {"type": "Feature", "geometry": null, "properties": {"shapeName": "Ghana"}}
            ]}"#,
        )
        .unwrap()
        .features;
        let records = vec![
            RegionSummary {
                region: "Western".to_string(),
                status: RegionStatus::Resilient,
                counts: ReadinessCounts::new(9, 1, 0, 10),
            },
            RegionSummary {
                region: "Greater Accra".to_string(),
                status: RegionStatus::Desert,
                counts: ReadinessCounts::new(0, 0, 4, 4),
            },
        ];
        let reconciler = Reconciler::builtin().unwrap();
        let layer = ChoroplethLayer::build(&features, &records, &reconciler, Some("Western"));

        let western = &layer.polygons[0];
        assert_eq!(western.key.as_str(), "western");
        assert_eq!(western.style.fill_color, "#22c55e");
        assert_eq!(western.style.border_weight, 3);
        assert_eq!(western.click_target.as_deref(), Some("Western"));

        for polygon in &layer.polygons[1..] {
            assert!(polygon.region.is_none());
            assert_eq!(polygon.style.fill_color, NEUTRAL_FILL);
            assert_eq!(polygon.style.border_weight, 1);
            assert!(polygon.click_target.is_none());
        }
        assert_eq!(layer.polygons[1].key.as_str(), "westernnorth");
        assert_eq!(layer.polygons[2].key.as_str(), "ghana");
        assert_eq!(layer.orphan_regions, vec![normalize("greateraccra")]);
    }
}

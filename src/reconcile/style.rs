//! Choropleth polygon styling

use super::aggregate::Aggregation;
use super::models::RegionStatus;
use super::normalize::RegionKey;
use serde::Serialize;

/// Fill for polygons without data
pub const NEUTRAL_FILL: &str = "#94a3b8";

const BORDER_COLOR: &str = "#64748b";
const SELECTED_BORDER_COLOR: &str = "#1e293b";

/// Map paint properties for one polygon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolygonStyle {
    pub fill_color: &'static str,
    pub border_weight: u8,
    pub border_color: &'static str,
    pub border_opacity: f32,
    pub fill_opacity: f32,
}

impl PolygonStyle {
    /// Style for features that carry no properties at all
    pub fn unlabeled() -> Self {
        Self {
            fill_color: NEUTRAL_FILL,
            border_weight: 1,
            border_color: BORDER_COLOR,
            border_opacity: 1.0,
            fill_opacity: 0.5,
        }
    }
}

/// Fill color for a status
pub fn status_color(status: RegionStatus) -> &'static str {
    match status {
        RegionStatus::Resilient => "#22c55e",
        RegionStatus::Fragile => "#f59e0b",
        RegionStatus::Desert => "#ef4444",
    }
}

/// Legend entries in display order
pub fn legend() -> Vec<(RegionStatus, &'static str)> {
    RegionStatus::ALL
        .iter()
        .map(|status| (*status, status_color(*status)))
        .collect()
}

/// Style a polygon from its canonical key.
///
/// `selected` must already be canonicalized; the caller decides how the
/// selected region name reconciles.
pub fn style_for(
    key: &RegionKey,
    aggregation: &Aggregation,
    selected: Option<&RegionKey>,
) -> PolygonStyle {
    let fill_color = aggregation
        .get(key)
        .map(|region| status_color(region.status))
        .unwrap_or(NEUTRAL_FILL);

    let is_selected = !key.is_empty() && selected == Some(key);

    PolygonStyle {
        fill_color,
        border_weight: if is_selected { 3 } else { 1 },
        border_color: if is_selected {
            SELECTED_BORDER_COLOR
        } else {
            BORDER_COLOR
        },
        border_opacity: 1.0,
        fill_opacity: if is_selected { 0.8 } else { 0.6 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::aggregate::aggregate;
    use crate::reconcile::aliases::AliasTable;
    use crate::reconcile::models::{ReadinessCounts, RegionSummary};
    use crate::reconcile::normalize::normalize;

    fn aggregation() -> Aggregation {
        let records = vec![RegionSummary {
            region: "Ashanti".to_string(),
            status: RegionStatus::Resilient,
            counts: ReadinessCounts::new(8, 1, 1, 10),
        }];
        aggregate(&records, &AliasTable::empty())
    }

    #[test]
    fn test_fill_from_status() {
        let style = style_for(&normalize("Ashanti"), &aggregation(), None);
        assert_eq!(style.fill_color, "#22c55e");
        assert_eq!(style.border_weight, 1);
        assert_eq!(style.fill_opacity, 0.6);
    }

    #[test]
    fn test_unmapped_polygon_is_neutral() {
        let style = style_for(&normalize("Oti"), &aggregation(), None);
        assert_eq!(style.fill_color, NEUTRAL_FILL);
    }

    #[test]
    fn test_selected_polygon_boosted() {
        let key = normalize("Ashanti Region");
        let style = style_for(&key, &aggregation(), Some(&normalize("ashanti")));
        assert_eq!(style.border_weight, 3);
        assert_eq!(style.border_color, SELECTED_BORDER_COLOR);
        assert_eq!(style.fill_opacity, 0.8);
    }

    #[test]
    fn test_empty_key_never_selected() {
        let empty = RegionKey::default();
        let style = style_for(&empty, &aggregation(), Some(&empty));
        assert_eq!(style.border_weight, 1);
    }

    #[test]
    fn test_legend_order() {
        let legend = legend();
        assert_eq!(legend[0], (RegionStatus::Resilient, "#22c55e"));
        assert_eq!(legend[2], (RegionStatus::Desert, "#ef4444"));
    }
}

//! Data models for region readiness summaries

use super::normalize::RegionKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of ready facilities above which a region is resilient
const RESILIENT_READY_RATIO: f64 = 0.5;
/// Share of fragile facilities above which a region is at least fragile
const FRAGILE_FRAGILE_RATIO: f64 = 0.3;
/// Share of ready facilities above which a region is at least fragile
const FRAGILE_READY_RATIO: f64 = 0.1;

/// Per-region aggregate readiness status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionStatus {
    Desert,
    Fragile,
    Resilient,
}

impl RegionStatus {
    pub const ALL: [RegionStatus; 3] = [Self::Resilient, Self::Fragile, Self::Desert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desert => "desert",
            Self::Fragile => "fragile",
            Self::Resilient => "resilient",
        }
    }

    /// Derive a status from facility counts.
    ///
    /// Comparisons are strict, so exactly half the facilities ready is not
    /// resilient. A zero total is a desert.
    pub fn from_counts(counts: &ReadinessCounts) -> Self {
        let ready = counts.ready_ratio();
        let fragile = counts.fragile_ratio();

        if ready > RESILIENT_READY_RATIO {
            Self::Resilient
        } else if fragile > FRAGILE_FRAGILE_RATIO || ready > FRAGILE_READY_RATIO {
            Self::Fragile
        } else {
            Self::Desert
        }
    }
}

impl fmt::Display for RegionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facility readiness counts for one region and capability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessCounts {
    #[serde(default)]
    pub ready: u64,
    #[serde(default)]
    pub fragile: u64,
    #[serde(default)]
    pub absent: u64,
    #[serde(default)]
    pub total: u64,
}

impl ReadinessCounts {
    pub fn new(ready: u64, fragile: u64, absent: u64, total: u64) -> Self {
        Self {
            ready,
            fragile,
            absent,
            total,
        }
    }

    /// Element-wise sum of all four fields
    pub fn merge(&mut self, other: &ReadinessCounts) {
        self.ready = self.ready.saturating_add(other.ready);
        self.fragile = self.fragile.saturating_add(other.fragile);
        self.absent = self.absent.saturating_add(other.absent);
        self.total = self.total.saturating_add(other.total);
    }

    pub fn ready_ratio(&self) -> f64 {
        ratio(self.ready, self.total)
    }

    pub fn fragile_ratio(&self) -> f64 {
        ratio(self.fragile, self.total)
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Region summary record as returned by `/regions/summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region: String,
    pub status: RegionStatus,
    #[serde(default)]
    pub counts: ReadinessCounts,
}

/// Counts of every summary record that reconciles to one canonical region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRegion {
    pub key: RegionKey,
    /// Display name of the first contributing record
    pub region: String,
    pub status: RegionStatus,
    pub counts: ReadinessCounts,
    /// Number of summary records merged into this entry
    pub sources: usize,
}

impl AggregatedRegion {
    pub(crate) fn seed(key: RegionKey, record: &RegionSummary) -> Self {
        Self {
            key,
            region: record.region.clone(),
            status: RegionStatus::from_counts(&record.counts),
            counts: record.counts,
            sources: 1,
        }
    }

    pub(crate) fn absorb(&mut self, record: &RegionSummary) {
        self.counts.merge(&record.counts);
        self.sources += 1;
        self.status = RegionStatus::from_counts(&self.counts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_resilient_above_half() {
        let counts = ReadinessCounts::new(6, 0, 4, 10);
        assert_eq!(RegionStatus::from_counts(&counts), RegionStatus::Resilient);
    }

    #[test]
    fn test_status_half_ready_is_not_resilient() {
        let counts = ReadinessCounts::new(5, 0, 5, 10);
        assert_eq!(RegionStatus::from_counts(&counts), RegionStatus::Fragile);
    }

    #[test]
    fn test_status_fragile_ratio_boundary() {
        // 3/10 fragile is not above 0.3 and 1/10 ready is not above 0.1
        let counts = ReadinessCounts::new(1, 3, 6, 10);
        assert_eq!(RegionStatus::from_counts(&counts), RegionStatus::Desert);

        let counts = ReadinessCounts::new(1, 4, 5, 10);
        assert_eq!(RegionStatus::from_counts(&counts), RegionStatus::Fragile);
    }

    #[test]
    fn test_status_zero_total_is_desert() {
        let counts = ReadinessCounts::default();
        assert_eq!(counts.ready_ratio(), 0.0);
        assert_eq!(RegionStatus::from_counts(&counts), RegionStatus::Desert);
    }

    #[test]
    fn test_summary_deserializes() {
        let json = r#"{"region":"Ashanti","status":"fragile","counts":{"ready":2,"fragile":3,"absent":5,"total":10}}"#;
        let summary: RegionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.status, RegionStatus::Fragile);
        assert_eq!(summary.counts.total, 10);
    }

    #[test]
    fn test_merge_sums_fields() {
        let mut counts = ReadinessCounts::new(1, 2, 3, 6);
        counts.merge(&ReadinessCounts::new(4, 0, 1, 5));
        assert_eq!(counts, ReadinessCounts::new(5, 2, 4, 11));
    }
}

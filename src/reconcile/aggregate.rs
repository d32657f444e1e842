//! Aggregation of summary records onto canonical regions

use super::aliases::AliasTable;
use super::models::{AggregatedRegion, RegionSummary};
use super::normalize::RegionKey;
use indexmap::IndexMap;
use tracing::trace;

/// Aggregated regions keyed by canonical key, in first-seen order
pub type Aggregation = IndexMap<RegionKey, AggregatedRegion>;

/// Sum the counts of every record sharing a canonical key and derive the
/// status of each combined region.
pub fn aggregate(records: &[RegionSummary], aliases: &AliasTable) -> Aggregation {
    let mut aggregation = Aggregation::with_capacity(records.len());

    for record in records {
        let key = aliases.canonical_key(&record.region);
        match aggregation.get_mut(&key) {
            Some(existing) => {
                trace!("Merging '{}' into '{}'", record.region, key);
                existing.absorb(record);
            }
            None => {
                aggregation.insert(key.clone(), AggregatedRegion::seed(key, record));
            }
        }
    }

    aggregation
}

/// First record, in list order, whose canonical key equals `key`
pub fn resolve_click_target<'a>(
    key: &RegionKey,
    records: &'a [RegionSummary],
    aliases: &AliasTable,
) -> Option<&'a RegionSummary> {
    if key.is_empty() {
        return None;
    }
    records
        .iter()
        .find(|record| &aliases.canonical_key(&record.region) == key)
}

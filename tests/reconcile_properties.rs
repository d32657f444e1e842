//! Reconciler properties over realistic region labels

use readiness_atlas::reconcile::{normalize, ReadinessCounts, Reconciler, RegionStatus, RegionSummary};

const LABELS: &[&str] = &[
    "Greater Accra Region",
    "GREATER  ACCRA",
    "Brong-Ahafo",
    "Brong–Ahafo Region",
    "Upper East (Region)",
    "Ga East Municipality, Greater Accra",
    "Ahafo Ano Souheast",
    "Western North",
    "Region",
    "Northern Region Region",
    "  ",
    "Ashanti’s",
];

fn record(region: &str, ready: u64, fragile: u64, absent: u64) -> RegionSummary {
    RegionSummary {
        region: region.to_string(),
        status: RegionStatus::Resilient,
        counts: ReadinessCounts::new(ready, fragile, absent, ready + fragile + absent),
    }
}

#[test]
fn test_normalize_is_idempotent_and_letters_only() {
    for label in LABELS {
        let key = normalize(label);
        assert_eq!(normalize(key.as_str()), key, "label {:?}", label);
        assert!(key.as_str().chars().all(|c| c.is_ascii_lowercase()));
        assert_eq!(normalize(&label.to_uppercase()), key);
        assert_eq!(normalize(&format!("  {}\t", label)), key);
    }
}

#[test]
fn test_canonical_key_is_stable() {
    let reconciler = Reconciler::builtin().unwrap();
    for label in LABELS {
        let key = reconciler.canonical_key(label);
        assert_eq!(reconciler.canonicalize(&key), key, "label {:?}", label);
    }
    assert_eq!(reconciler.canonical_key("Brong–Ahafo Region").as_str(), "bono");
    assert_eq!(reconciler.canonical_key("Ahafo Ano Souheast").as_str(), "ashanti");
}

#[test]
fn test_every_canonical_key_maps_to_itself() {
    let reconciler = Reconciler::builtin().unwrap();
    for key in reconciler.aliases().canonical_keys() {
        assert_eq!(&reconciler.canonicalize(key), key);
    }
}

#[test]
fn test_aggregate_counts_independent_of_order() {
    let reconciler = Reconciler::builtin().unwrap();
    let records = vec![
        record("Greater Accra", 3, 1, 1),
        record("East Legon", 0, 2, 0),
        record("Tema West Municipal", 1, 0, 4),
        record("Volta", 0, 0, 0),
        record("Dormaa East", 2, 0, 0),
    ];

    let forward = reconciler.aggregate(&records);
    let mut reversed_records = records.clone();
    reversed_records.reverse();
    let reversed = reconciler.aggregate(&reversed_records);

    assert_eq!(forward.len(), reversed.len());
    for (key, region) in &forward {
        let other = &reversed[key];
        assert_eq!(region.counts, other.counts);
        assert_eq!(region.status, other.status);
        assert_eq!(region.status, RegionStatus::from_counts(&region.counts));
    }

    let accra = &forward[&normalize("greateraccra")];
    assert_eq!(accra.counts, ReadinessCounts::new(4, 3, 5, 12));
    assert_eq!(accra.status, RegionStatus::Fragile);
    assert_eq!(accra.region, "Greater Accra");
    assert_eq!(forward[&normalize("volta")].status, RegionStatus::Desert);
}

#[test]
fn test_click_resolves_to_first_record_in_list_order() {
    let reconciler = Reconciler::builtin().unwrap();
    let records = vec![
        record("Accra North", 1, 0, 0),
        record("Greater Accra", 5, 0, 0),
    ];
    let key = reconciler.canonical_key("Greater Accra Region");
    let target = reconciler.resolve_click_target(&key, &records).unwrap();
    assert_eq!(target.region, "Accra North");

    let empty = normalize("");
    assert!(reconciler.resolve_click_target(&empty, &records).is_none());
}

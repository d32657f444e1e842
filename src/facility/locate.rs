//! Approximate facility coordinates
//!
//! Facilities rarely carry coordinates. A town named in the facility name
//! gives a close guess; the region centroid gives a coarse one. Both are
//! jittered so markers at the same town do not stack.

use crate::api::Facility;
use crate::reconcile::{normalize, Reconciler};
use rand::Rng;
use serde::Serialize;

/// Jitter span around a town centroid, in degrees
const TOWN_JITTER: f64 = 0.05;
/// Jitter span around a region centroid, in degrees
const REGION_JITTER: f64 = 0.3;
/// Town names this short only match a whole word of the facility name
const SHORT_TOWN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

const fn at(lat: f64, lng: f64) -> Coords {
    Coords { lat, lng }
}

/// Town centroids, searched in order
const TOWNS: &[(&str, Coords)] = &[
    // Greater Accra
    ("accra", at(5.6037, -0.1870)),
    ("tema", at(5.6698, -0.0166)),
    ("dansoman", at(5.5360, -0.2500)),
    ("osu", at(5.5560, -0.1820)),
    ("eastlegon", at(5.6340, -0.1570)),
    ("cantonments", at(5.5760, -0.1740)),
    ("adabraka", at(5.5670, -0.2100)),
    ("tantrahill", at(5.6380, -0.2350)),
    ("abokobi", at(5.7070, -0.1530)),
    ("madina", at(5.6760, -0.1650)),
    ("lapaz", at(5.6090, -0.2410)),
    ("spintex", at(5.6370, -0.0580)),
    // Western
    ("takoradi", at(4.8845, -1.7554)),
    ("sekondi", at(4.9340, -1.7137)),
    ("tarkwa", at(5.3040, -1.9940)),
    ("apremdo", at(4.9280, -1.7520)),
    ("effiakuma", at(4.9170, -1.7600)),
    // Ashanti
    ("kumasi", at(6.6885, -1.6244)),
    ("obuasi", at(6.2060, -1.6630)),
    ("ejisu", at(6.7280, -1.4650)),
    ("abuakwa", at(6.7470, -1.5430)),
    ("bekwai", at(6.4560, -1.5730)),
    ("mampong", at(7.0640, -1.4000)),
    ("asokwa", at(6.6620, -1.6230)),
    // Central
    ("capecoast", at(5.1053, -1.2466)),
    ("elmina", at(5.0847, -1.3486)),
    ("winneba", at(5.3531, -0.6250)),
    ("agona", at(5.5650, -0.7330)),
    ("saltpond", at(5.2090, -1.0600)),
    // Eastern
    ("koforidua", at(6.0940, -0.2570)),
    ("nkawkaw", at(6.5500, -0.7670)),
    ("nsawam", at(5.8080, -0.3500)),
    ("suhum", at(6.0400, -0.4500)),
    ("akim", at(6.0500, -0.7500)),
    // Volta
    ("ho", at(6.6000, 0.4700)),
    ("keta", at(5.9200, 0.9900)),
    ("hohoe", at(7.1510, 0.4740)),
    ("kpando", at(6.9950, 0.2970)),
    ("aflao", at(6.1200, 1.1940)),
    // Northern
    ("tamale", at(9.4075, -0.8533)),
    ("yendi", at(9.4450, -0.0090)),
    ("bimbilla", at(8.8540, 0.0530)),
    ("savelugu", at(9.6240, -0.8250)),
    // Upper East
    ("bolgatanga", at(10.7870, -0.8510)),
    ("navrongo", at(10.8940, -1.0920)),
    ("bawku", at(11.0590, -0.2420)),
    ("zuarungu", at(10.7830, -0.8160)),
    // Upper West
    ("wa", at(10.0601, -2.5099)),
    ("lawra", at(10.6380, -2.9050)),
    ("tumu", at(10.8880, -1.9790)),
    ("nadowli", at(10.3910, -2.6610)),
    // Bono
    ("sunyani", at(7.3349, -2.3123)),
    ("techiman", at(7.5830, -1.9340)),
    ("dormaa", at(7.4180, -2.7790)),
    ("berekum", at(7.4560, -2.5860)),
    ("wenchi", at(7.7390, -2.1000)),
    ("kintampo", at(8.0560, -1.7290)),
    ("nkoranza", at(7.5560, -1.7110)),
    // Oti
    ("dambai", at(8.0690, 0.1790)),
    ("jasikan", at(7.4080, 0.4590)),
    ("nkwanta", at(8.2570, 0.5210)),
    // Savannah
    ("damongo", at(9.0830, -1.8180)),
    ("bole", at(9.0330, -2.4830)),
    ("salaga", at(8.5510, -0.5210)),
    // Ahafo
    ("goaso", at(6.8030, -2.5170)),
    // North East
    ("nalerigu", at(10.5250, -0.3670)),
    ("walewale", at(10.3550, -0.7970)),
];

/// Region centroids keyed by normalized region name
const REGIONS: &[(&str, Coords)] = &[
    ("western", at(5.1, -2.0)),
    ("greateraccra", at(5.6, -0.2)),
    ("ashanti", at(6.7, -1.6)),
    ("central", at(5.5, -1.0)),
    ("eastern", at(6.3, -0.5)),
    ("volta", at(6.8, 0.5)),
    ("oti", at(8.0, 0.4)),
    ("northern", at(9.5, -1.0)),
    ("uppereast", at(10.8, -0.8)),
    ("upperwest", at(10.3, -2.3)),
    ("bono", at(7.5, -2.3)),
    ("bonoeast", at(7.8, -1.5)),
    ("ahafo", at(6.9, -2.4)),
    ("savannah", at(9.0, -1.8)),
    ("northeast", at(10.4, -0.5)),
    ("westernnorth", at(6.2, -2.4)),
];

fn letters_only(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn town_in_name(name: &str) -> Option<Coords> {
    let squashed = letters_only(name);
    let words: Vec<String> = name.split_whitespace().map(letters_only).collect();

    TOWNS.iter().find_map(|(town, coords)| {
        let found = if town.len() <= SHORT_TOWN {
            words.iter().any(|word| word == town)
        } else {
            squashed.contains(town)
        };
        found.then_some(*coords)
    })
}

/// Centroid for a region name, if it names a known region
pub fn region_centroid(region: &str) -> Option<Coords> {
    let key = normalize(region);
    REGIONS
        .iter()
        .find(|(name, _)| *name == key.as_str())
        .map(|(_, coords)| *coords)
}

fn jitter<R: Rng>(coords: Coords, span: f64, rng: &mut R) -> Coords {
    Coords {
        lat: coords.lat + (rng.gen::<f64>() - 0.5) * span,
        lng: coords.lng + (rng.gen::<f64>() - 0.5) * span,
    }
}

/// Guess coordinates from a facility name, then from its region
pub fn find_facility_coords<R: Rng>(
    name: &str,
    region: &str,
    rng: &mut R,
) -> Option<Coords> {
    if let Some(coords) = town_in_name(name) {
        return Some(jitter(coords, TOWN_JITTER, rng));
    }
    region_centroid(region).map(|coords| jitter(coords, REGION_JITTER, rng))
}

/// Places facilities on the map
#[derive(Debug, Clone)]
pub struct FacilityLocator {
    reconciler: Reconciler,
}

impl FacilityLocator {
    pub fn new(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    /// Explicit coordinates win; otherwise guess from name and region.
    ///
    /// The region is canonicalized first, so district-level labels such as
    /// "Techiman Municipal" fall back to their region's centroid.
    pub fn locate<R: Rng>(
        &self,
        facility: &Facility,
        region: &str,
        rng: &mut R,
    ) -> Option<Coords> {
        if let (Some(lat), Some(lng)) = (facility.lat, facility.lng) {
            return Some(Coords { lat, lng });
        }
        find_facility_coords(&facility.name, region, rng).or_else(|| {
            let canonical = self.reconciler.canonical_key(region);
            find_facility_coords(&facility.name, canonical.as_str(), rng)
        })
    }
}

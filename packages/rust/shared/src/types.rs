//! Core domain types for the travel knowledge base.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A point on Earth in signed decimal degrees.
///
/// The zero value `(0.0, 0.0)` doubles as the "unknown location" sentinel:
/// entity records without geodata default to it and flow through distance
/// computation unguarded, yielding whatever distance the origin has to the
/// null island. This matches the upstream data contract and is not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, nominally in [-90, 90].
    pub lat: f64,
    /// Longitude in degrees, nominally in [-180, 180].
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// ---------------------------------------------------------------------------
// DestinationRecord
// ---------------------------------------------------------------------------

/// Per-country record, progressively filled by the pipeline stages.
///
/// Created when the entity list is loaded, enriched with `distance_km`
/// by the geo stage and with `attributes` by the crawl stage, then
/// consumed exactly once by the fact writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationRecord {
    /// Country name — the external key. Records are deduplicated on it at
    /// creation, first-seen wins.
    pub name: String,
    /// Capital name, display only.
    pub capital: String,
    /// Capital coordinates, zero-sentinel when the source omits them.
    pub coordinate: Coordinate,
    /// Great-circle distance from the origin in km. `None` until the
    /// distance stage has run.
    pub distance_km: Option<f64>,
    /// Ordered, duplicate-free activity tags. Empty until the crawl stage
    /// has run (and legitimately empty for destinations with no guide page).
    pub attributes: Vec<String>,
}

impl DestinationRecord {
    /// A fresh record before any enrichment stage has run.
    pub fn new(name: impl Into<String>, capital: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            capital: capital.into(),
            coordinate,
            distance_km: None,
            attributes: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default activity vocabulary
// ---------------------------------------------------------------------------

/// The fixed activity vocabulary, in emission order. Matching is literal
/// substring containment against lowercased page text, so every term is
/// lowercase. Config may replace the list but not reorder matches.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    // mountain
    "trekking",
    "climbing",
    "skiing",
    "snowboarding",
    "snowshoeing",
    "canyon",
    "cave",
    // water
    "diving",
    "rafting",
    "sailing",
    "snorkel",
    "surfing",
    "fishing",
    "kayak",
    "swimming",
    "beach",
    // forest
    "hiking",
    "camping",
    "birdwatching",
    "hunting",
    // cultural
    "museum",
    "historical place",
    "castle",
    "nightlife",
    "vineyard",
    "beer",
    // recreational
    "biking",
    "golf",
    "safari",
    "sandboarding",
    "zipline",
];

/// The default vocabulary as owned strings, for config defaults.
pub fn default_vocabulary() -> Vec<String> {
    DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_coordinate_is_default() {
        let c = Coordinate::default();
        assert_eq!(c.lat, 0.0);
        assert_eq!(c.lng, 0.0);
    }

    #[test]
    fn fresh_record_is_unenriched() {
        let r = DestinationRecord::new("France", "Paris", Coordinate::new(48.85, 2.35));
        assert!(r.distance_km.is_none());
        assert!(r.attributes.is_empty());
    }

    #[test]
    fn default_vocabulary_is_lowercase_and_unique() {
        let vocab = default_vocabulary();
        assert_eq!(vocab.len(), 30);
        for term in &vocab {
            assert_eq!(*term, term.to_lowercase());
        }
        let mut dedup = vocab.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), vocab.len());
    }
}

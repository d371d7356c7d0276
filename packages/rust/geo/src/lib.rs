//! Great-circle distance and travel-time bucketing.
//!
//! Distances feed two outputs: the raw `distance('Name', "NNNN km").` fact
//! and a set of coarse travel-time labels. The label ladder is cascading,
//! not mutually exclusive — a nearby destination collects every tier it
//! falls under, which is what the downstream rule engine expects.

use travelkb_shared::Coordinate;

/// Earth radius used by the haversine formula, in km.
///
/// Kept at 6373.0 for compatibility with the fact files already consumed
/// downstream; do not swap in the usual 6371.0 mean radius.
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// Travel-time ladder: inclusive upper bound in km and the emitted label.
/// Each rung is evaluated independently, in this order.
const BUCKET_LADDER: [(f64, &str); 5] = [
    (110_000.0, "long haul"),
    (11_000.0, "full day"),
    (6_000.0, "half day"),
    (4_000.0, "few hours"),
    (2_000.0, "close"),
];

/// Haversine great-circle distance between two coordinates, in km.
///
/// Inputs are degrees. No range validation: the `(0, 0)` unknown-location
/// sentinel flows through like any other point, and a zero distance is a
/// valid result, not an error.
pub fn distance_km(origin: Coordinate, target: Coordinate) -> f64 {
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();
    let lat2 = target.lat.to_radians();
    let lng2 = target.lng.to_radians();

    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Map a distance to its travel-time labels, in ladder order.
///
/// Every real-world distance (max ~20000 km) matches at least "long haul";
/// distances beyond the top rung yield an empty sequence.
pub fn bucket_labels(distance_km: f64) -> Vec<&'static str> {
    BUCKET_LADDER
        .iter()
        .filter(|(bound, _)| distance_km < *bound)
        .map(|(_, label)| *label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_reflexive() {
        let p = Coordinate::new(41.88, -87.63);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let chicago = Coordinate::new(41.88, -87.63);
        let paris = Coordinate::new(48.85, 2.35);
        let there = distance_km(chicago, paris);
        let back = distance_km(paris, chicago);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn chicago_to_paris_is_plausible() {
        let chicago = Coordinate::new(41.8781, -87.6298);
        let paris = Coordinate::new(48.8566, 2.3522);
        let d = distance_km(chicago, paris);
        assert!(d > 6500.0 && d < 6800.0, "got {d}");
    }

    #[test]
    fn zero_sentinel_flows_through() {
        let d = distance_km(Coordinate::default(), Coordinate::default());
        assert_eq!(d, 0.0);
        assert_eq!(
            bucket_labels(d),
            vec!["long haul", "full day", "half day", "few hours", "close"]
        );
    }

    #[test]
    fn nearby_distance_accumulates_tiers() {
        assert_eq!(
            bucket_labels(5000.0),
            vec!["long haul", "full day", "half day"]
        );
        assert_eq!(bucket_labels(1999.9).len(), 5);
    }

    #[test]
    fn beyond_top_rung_yields_nothing() {
        assert!(bucket_labels(150_000.0).is_empty());
    }

    #[test]
    fn bounds_are_exclusive_upper() {
        // A distance exactly on a rung does not earn that rung's label.
        assert_eq!(bucket_labels(2000.0).len(), 4);
        assert_eq!(bucket_labels(110_000.0).len(), 0);
    }
}

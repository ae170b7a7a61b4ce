//! Property tests for the cell decomposition and covering invariants.

use proptest::prelude::*;

use geonear_core::cellid::{CellId, MAX_LEVEL};
use geonear_core::covering::{covering_ranges, CoveringConfig, STORAGE_LEVEL};
use geonear_core::latlng::LatLng;

proptest! {
    /// Identical coordinates always map to identical cell IDs.
    #[test]
    fn cell_id_is_deterministic(lat in -89.9f64..89.9, lng in -179.9f64..179.9) {
        let ll = LatLng::new(lat, lng).unwrap();
        prop_assert_eq!(CellId::from_lat_lng(ll), CellId::from_lat_lng(ll));
    }

    /// A leaf is contained by its ancestor at every level.
    #[test]
    fn ancestors_contain_leaf(lat in -89.9f64..89.9, lng in -179.9f64..179.9, level in 0u8..=MAX_LEVEL) {
        let leaf = CellId::from_lat_lng(LatLng::new(lat, lng).unwrap());
        let parent = leaf.parent(level);
        prop_assert_eq!(parent.level(), level);
        prop_assert!(parent.contains(leaf));
    }

    /// Coverings are bounded, ordered, and never lose the disc center.
    #[test]
    fn covering_invariants(
        lat in -89.0f64..89.0,
        lng in -179.0f64..179.0,
        radius in 0.0f64..40.0,
    ) {
        let center = LatLng::new(lat, lng).unwrap();
        let config = CoveringConfig::default();
        let ranges = covering_ranges(center, radius, &config);

        prop_assert!(!ranges.is_empty());
        prop_assert!(ranges.len() <= config.max_cells);
        for r in &ranges {
            prop_assert!(r.start <= r.end);
            prop_assert_eq!(r.start.level(), STORAGE_LEVEL);
            prop_assert_eq!(r.end.level(), STORAGE_LEVEL);
        }

        let center_cell = CellId::from_lat_lng(center).parent(STORAGE_LEVEL);
        prop_assert!(ranges.iter().any(|r| r.contains(center_cell)));
    }

    /// Points inside the disc always land inside the covering. The covering
    /// may over-cover, but it must never under-cover.
    #[test]
    fn covering_never_undercovers(
        lat in -80.0f64..80.0,
        lng in -170.0f64..170.0,
        radius in 0.5f64..25.0,
        // Offset of the probe point, as a fraction of the radius.
        frac in 0.0f64..0.95,
        bearing in 0.0f64..(2.0 * std::f64::consts::PI),
    ) {
        let center = LatLng::new(lat, lng).unwrap();
        // A crude small-displacement probe: offset in degrees along the
        // bearing. One degree of latitude is ~69 miles.
        let dist_deg = radius * frac / 69.0;
        let probe_lat = lat + dist_deg * bearing.cos();
        let probe_lng = lng + dist_deg * bearing.sin() / lat.to_radians().cos().max(0.1);
        prop_assume!((-90.0..=90.0).contains(&probe_lat));
        prop_assume!((-180.0..=180.0).contains(&probe_lng));
        let probe = LatLng::new(probe_lat, probe_lng).unwrap();

        // Only meaningful when the probe really is inside the disc.
        let angle = center.to_point().angle(&probe.to_point());
        prop_assume!(angle <= radius / geonear_core::EARTH_RADIUS_MILES);

        let ranges = covering_ranges(center, radius, &CoveringConfig::default());
        let cell = CellId::from_lat_lng(probe).parent(STORAGE_LEVEL);
        prop_assert!(ranges.iter().any(|r| r.contains(cell)));
    }
}

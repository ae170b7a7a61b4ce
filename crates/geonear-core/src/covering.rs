//! Disc coverings: the minimal machinery to turn "within R miles of here"
//! into a bounded set of cell-ID ranges.
//!
//! [`covering_ranges`] approximates a spherical cap with at most
//! [`MAX_COVERING_CELLS`] cells via budgeted breadth-first refinement from
//! the six face cells: cells that cannot intersect the cap are dropped,
//! cells fully inside the cap (or at the target level) are kept, and when
//! splitting a cell would exceed the budget the cell is kept whole at its
//! current level. Over-covering is acceptable; under-covering never is, so
//! every pruning test is conservative.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cellid::{CellId, CellRange};
use crate::latlng::{LatLng, Point};

/// Earth radius used for the miles-to-radians conversion.
///
/// The level-selection ladder below is tuned against this exact constant;
/// substituting a different radius shifts which level a given radius maps to.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Level at which program locations are stored (~600 m cells).
pub const STORAGE_LEVEL: u8 = 13;

/// Maximum number of cells in a covering. Performance tuning parameter: more
/// cells means tighter coverage but more range queries per search.
pub const MAX_COVERING_CELLS: usize = 20;

/// Tuning constants for covering computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveringConfig {
    /// Hierarchy depth at which cell IDs are persisted and compared.
    pub storage_level: u8,
    /// Upper bound on the number of ranges returned. Values below six (the
    /// face-cell count) may be exceeded.
    pub max_cells: usize,
}

impl Default for CoveringConfig {
    fn default() -> Self {
        CoveringConfig {
            storage_level: STORAGE_LEVEL,
            max_cells: MAX_COVERING_CELLS,
        }
    }
}

/// A spherical cap: all points within `radius` radians of `center`.
#[derive(Debug, Clone, Copy)]
struct Cap {
    center: Point,
    radius: f64,
}

impl Cap {
    fn contains(&self, p: &Point) -> bool {
        self.center.angle(p) <= self.radius
    }
}

/// Computes cell ranges covering the disc of `radius_miles` around `center`.
///
/// Each returned range is the leaf-descendant span of one covering cell,
/// truncated to `config.storage_level` so endpoints compare directly against
/// stored cell IDs. The union of ranges always contains the full disc; the
/// covering may extend modestly beyond it. Never returns more than
/// `config.max_cells` ranges. A non-negative, finite radius is assumed;
/// callers validate upstream.
pub fn covering_ranges(center: LatLng, radius_miles: f64, config: &CoveringConfig) -> Vec<CellRange> {
    let cap = Cap {
        center: center.to_point(),
        radius: radius_miles / EARTH_RADIUS_MILES,
    };
    let max_level = max_level_for_radius(radius_miles, config.storage_level);
    let center_leaf = CellId::from_lat_lng(center);

    let mut result: Vec<CellId> = Vec::new();
    let mut queue: VecDeque<CellId> = (0..6)
        .map(CellId::from_face)
        .filter(|cell| may_intersect(*cell, &cap, center_leaf))
        .collect();

    while let Some(cell) = queue.pop_front() {
        if cell.level() >= max_level || cap_contains_cell(&cap, cell) {
            result.push(cell);
            continue;
        }
        let kids: SmallVec<[CellId; 4]> = cell
            .children()
            .into_iter()
            .filter(|kid| may_intersect(*kid, &cap, center_leaf))
            .collect();
        if result.len() + queue.len() + kids.len() > config.max_cells {
            // Splitting would exceed the budget; keep the coarser cell.
            result.push(cell);
        } else {
            queue.extend(kids);
        }
    }

    let mut ranges: Vec<CellRange> = result
        .into_iter()
        .map(|cell| {
            CellRange::new(
                cell.range_min().parent(config.storage_level),
                cell.range_max().parent(config.storage_level),
            )
        })
        .collect();
    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Picks the finest covering level for a radius. Larger radii use coarser
/// cells, trading precision for cell count; never finer than storage level.
fn max_level_for_radius(radius_miles: f64, storage_level: u8) -> u8 {
    if radius_miles <= 1.0 {
        storage_level
    } else if radius_miles <= 5.0 {
        storage_level - 1
    } else if radius_miles <= 10.0 {
        storage_level - 2
    } else {
        storage_level - 3
    }
}

/// Conservative intersection test: never returns false for a cell that
/// actually intersects the cap.
///
/// Either the cell contains the cap's center (exact, by ID range), or the
/// cap center lies within `cap.radius + circumradius` of the cell center.
/// The circumradius is the exact farthest-vertex distance, which bounds the
/// distance to every point of the cell.
fn may_intersect(cell: CellId, cap: &Cap, center_leaf: CellId) -> bool {
    if cell.contains(center_leaf) {
        return true;
    }
    let center = cell.center_point();
    let circumradius = cell
        .vertices()
        .iter()
        .map(|v| center.angle(v))
        .fold(0.0, f64::max);
    center.angle(&cap.center) <= cap.radius + circumradius
}

/// True when the whole cell lies inside the cap.
///
/// Valid only for caps smaller than a hemisphere, where the cap is convex:
/// the four edges are geodesics between contained vertices and therefore
/// stay contained, and the cell interior with them. Larger caps just fall
/// through to subdivision.
fn cap_contains_cell(cap: &Cap, cell: CellId) -> bool {
    cap.radius < std::f64::consts::FRAC_PI_2
        && cell.vertices().iter().all(|v| cap.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nyc() -> LatLng {
        LatLng::new(40.7128, -74.0060).unwrap()
    }

    fn config() -> CoveringConfig {
        CoveringConfig::default()
    }

    /// The storage-level cell of the disc center must fall inside the union.
    fn assert_covers_center(center: LatLng, ranges: &[CellRange], storage_level: u8) {
        let center_cell = CellId::from_lat_lng(center).parent(storage_level);
        assert!(
            ranges.iter().any(|r| r.contains(center_cell)),
            "no range contains the center cell"
        );
    }

    #[test]
    fn five_mile_covering_around_nyc() {
        let ranges = covering_ranges(nyc(), 5.0, &config());
        assert!(!ranges.is_empty());
        assert!(ranges.len() <= MAX_COVERING_CELLS);
        for r in &ranges {
            assert!(r.start <= r.end);
            assert_eq!(r.start.level(), STORAGE_LEVEL);
            assert_eq!(r.end.level(), STORAGE_LEVEL);
        }
        assert_covers_center(nyc(), &ranges, STORAGE_LEVEL);
    }

    #[test]
    fn zero_radius_still_covers_center() {
        let ranges = covering_ranges(nyc(), 0.0, &config());
        assert!(!ranges.is_empty());
        assert!(ranges.len() <= MAX_COVERING_CELLS);
        assert_covers_center(nyc(), &ranges, STORAGE_LEVEL);
    }

    #[test]
    fn large_radius_stays_within_budget() {
        for radius in [50.0, 500.0, 5000.0] {
            let ranges = covering_ranges(nyc(), radius, &config());
            assert!(!ranges.is_empty());
            assert!(ranges.len() <= MAX_COVERING_CELLS, "radius {radius}");
            assert_covers_center(nyc(), &ranges, STORAGE_LEVEL);
        }
    }

    #[test]
    fn covering_is_deterministic() {
        let a = covering_ranges(nyc(), 5.0, &config());
        let b = covering_ranges(nyc(), 5.0, &config());
        assert_eq!(a, b);
    }

    #[test]
    fn level_ladder_matches_radius() {
        assert_eq!(max_level_for_radius(0.5, STORAGE_LEVEL), 13);
        assert_eq!(max_level_for_radius(1.0, STORAGE_LEVEL), 13);
        assert_eq!(max_level_for_radius(5.0, STORAGE_LEVEL), 12);
        assert_eq!(max_level_for_radius(10.0, STORAGE_LEVEL), 11);
        assert_eq!(max_level_for_radius(25.0, STORAGE_LEVEL), 10);
    }

    #[test]
    fn nearby_point_falls_in_covering() {
        // A point ~1.4 miles north of the center must be covered by a
        // 5-mile search disc.
        let nearby = LatLng::new(40.7328, -74.0060).unwrap();
        let ranges = covering_ranges(nyc(), 5.0, &config());
        let cell = CellId::from_lat_lng(nearby).parent(STORAGE_LEVEL);
        assert!(ranges.iter().any(|r| r.contains(cell)));
    }

    #[test]
    fn ranges_are_sorted_and_disjoint() {
        let ranges = covering_ranges(nyc(), 5.0, &config());
        for pair in ranges.windows(2) {
            assert!(pair[0].start <= pair[1].start);
            assert!(pair[0].end < pair[1].start, "covering cells are disjoint");
        }
    }
}

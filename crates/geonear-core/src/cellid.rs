//! Hierarchical spatial cell identifiers.
//!
//! The sphere is projected onto the six faces of a cube; each face is
//! recursively subdivided as a quadtree down to level 30, and leaf cells are
//! ordered along a Hilbert curve. A [`CellId`] packs this into a single u64:
//! 3 face bits, 60 position bits (2 per level), and a trailing marker bit
//! whose position encodes the level. The encoding has two properties the
//! rest of the system relies on:
//!
//! - numeric ordering of IDs at a fixed level follows the Hilbert curve, so
//!   nearby cells usually have nearby IDs and a contiguous spatial region is
//!   a small set of ID ranges;
//! - all descendants of a cell form one contiguous ID interval,
//!   `[range_min, range_max]`, enabling ancestor containment checks and
//!   ordered-index range scans with plain integer comparisons.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::latlng::{LatLng, Point};

/// Deepest subdivision level (leaf cells).
pub const MAX_LEVEL: u8 = 30;

/// Bits used for the Hilbert position, including the trailing marker bit.
const POS_BITS: u32 = 2 * MAX_LEVEL as u32 + 1;

/// Leaf-grid extent along one axis of a face (2^30).
const MAX_SIZE: u32 = 1 << MAX_LEVEL;

const LOOKUP_BITS: u32 = 4;
const SWAP_MASK: usize = 0x01;
const INVERT_MASK: usize = 0x02;

/// Hilbert traversal order of the four children for each orientation.
const POS_TO_IJ: [[usize; 4]; 4] = [
    [0, 1, 3, 2],
    [0, 2, 3, 1],
    [3, 2, 0, 1],
    [3, 1, 0, 2],
];

/// Orientation adjustment applied when descending into each child position.
const POS_TO_ORIENTATION: [usize; 4] = [SWAP_MASK, 0, 0, SWAP_MASK | INVERT_MASK];

/// Precomputed 4-level Hilbert lookup tables, mapping 4+4 bits of (i,j) plus
/// 2 orientation bits to 8 position bits (and back).
struct Lookup {
    pos: [u16; 1 << (2 * LOOKUP_BITS + 2)],
    ij: [u16; 1 << (2 * LOOKUP_BITS + 2)],
}

fn lookup() -> &'static Lookup {
    static TABLES: OnceLock<Lookup> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut tables = Lookup {
            pos: [0; 1 << (2 * LOOKUP_BITS + 2)],
            ij: [0; 1 << (2 * LOOKUP_BITS + 2)],
        };
        for orientation in 0..4 {
            init_lookup_cell(0, 0, 0, orientation, 0, orientation, &mut tables);
        }
        tables
    })
}

fn init_lookup_cell(
    level: u32,
    i: usize,
    j: usize,
    orig_orientation: usize,
    pos: usize,
    orientation: usize,
    tables: &mut Lookup,
) {
    if level == LOOKUP_BITS {
        let ij = (i << LOOKUP_BITS) + j;
        tables.pos[(ij << 2) + orig_orientation] = ((pos << 2) + orientation) as u16;
        tables.ij[(pos << 2) + orig_orientation] = ((ij << 2) + orientation) as u16;
        return;
    }
    let r = &POS_TO_IJ[orientation];
    for (index, &child) in r.iter().enumerate() {
        init_lookup_cell(
            level + 1,
            (i << 1) + (child >> 1),
            (j << 1) + (child & 1),
            orig_orientation,
            (pos << 2) + index,
            orientation ^ POS_TO_ORIENTATION[index],
            tables,
        );
    }
}

/// A 64-bit hierarchical cell identifier.
///
/// Comparable and orderable; numeric ordering at a fixed level approximates
/// spatial locality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u64);

impl CellId {
    /// Maps a coordinate to the leaf cell (level 30) containing it.
    ///
    /// Deterministic: identical inputs always yield identical IDs.
    pub fn from_lat_lng(ll: LatLng) -> CellId {
        let p = ll.to_point();
        let (face, u, v) = xyz_to_face_uv(&p);
        let i = st_to_ij(uv_to_st(u));
        let j = st_to_ij(uv_to_st(v));
        CellId::from_face_ij(face, i, j)
    }

    /// The top-level cell for one cube face (level 0). `face` must be < 6.
    pub fn from_face(face: u8) -> CellId {
        CellId(((face as u64) << (POS_BITS - 1)) + lsb_for_level(0))
    }

    /// Builds the leaf cell ID for leaf-grid coordinates (i, j) on a face.
    fn from_face_ij(face: u8, i: u32, j: u32) -> CellId {
        let tables = lookup();
        let mut n = (face as u64) << (POS_BITS - 1);
        let mut bits = (face as usize) & SWAP_MASK;
        // Eight passes of 4 i-bits and 4 j-bits each; the top pass carries
        // only 2 significant bits of each, zero-padded.
        for k in (0..8).rev() {
            let mask = (1usize << LOOKUP_BITS) - 1;
            bits += (((i >> (k * LOOKUP_BITS)) as usize) & mask) << (LOOKUP_BITS + 2);
            bits += (((j >> (k * LOOKUP_BITS)) as usize) & mask) << 2;
            bits = tables.pos[bits] as usize;
            n |= ((bits >> 2) as u64) << (k * 2 * LOOKUP_BITS);
            bits &= SWAP_MASK | INVERT_MASK;
        }
        CellId(n * 2 + 1)
    }

    /// Recovers the face and leaf-grid (i, j) coordinates of this cell's
    /// position bits.
    fn to_face_ij(self) -> (u8, u32, u32) {
        let tables = lookup();
        let face = self.face();
        let mut bits = (face as usize) & SWAP_MASK;
        let mut i = 0u32;
        let mut j = 0u32;
        for k in (0..8u32).rev() {
            let nbits = if k == 7 { MAX_LEVEL as u32 - 7 * LOOKUP_BITS } else { LOOKUP_BITS };
            bits += (((self.0 >> (k * 2 * LOOKUP_BITS + 1)) as usize) & ((1 << (2 * nbits)) - 1)) << 2;
            bits = tables.ij[bits] as usize;
            i += ((bits >> (LOOKUP_BITS + 2)) as u32) << (k * LOOKUP_BITS);
            j += (((bits >> 2) as u32) & ((1 << LOOKUP_BITS) - 1)) << (k * LOOKUP_BITS);
            bits &= SWAP_MASK | INVERT_MASK;
        }
        (face, i, j)
    }

    /// The cube face (0..6) this cell lies on.
    pub fn face(self) -> u8 {
        (self.0 >> POS_BITS) as u8
    }

    /// Lowest set bit; its position encodes the level.
    fn lsb(self) -> u64 {
        self.0 & self.0.wrapping_neg()
    }

    /// The subdivision level of this cell (0 = face cell, 30 = leaf).
    pub fn level(self) -> u8 {
        MAX_LEVEL - (self.0.trailing_zeros() as u8 >> 1)
    }

    /// True for IDs with a valid face and marker bit.
    pub fn is_valid(self) -> bool {
        self.face() < 6 && (self.lsb() & 0x1555_5555_5555_5555) != 0
    }

    /// True for level-30 cells.
    pub fn is_leaf(self) -> bool {
        self.0 & 1 == 1
    }

    /// The ancestor of this cell at a coarser `level` (level <= self.level()).
    pub fn parent(self, level: u8) -> CellId {
        debug_assert!(level <= self.level());
        let lsb = lsb_for_level(level);
        CellId((self.0 & lsb.wrapping_neg()) | lsb)
    }

    /// Smallest leaf-cell ID among this cell's descendants.
    pub fn range_min(self) -> CellId {
        CellId(self.0 - (self.lsb() - 1))
    }

    /// Largest leaf-cell ID among this cell's descendants.
    pub fn range_max(self) -> CellId {
        CellId(self.0 + (self.lsb() - 1))
    }

    /// True when `other` is this cell or one of its descendants.
    pub fn contains(self, other: CellId) -> bool {
        self.range_min() <= other && other <= self.range_max()
    }

    /// The four children of this cell, in Hilbert order. Must not be a leaf.
    pub fn children(self) -> [CellId; 4] {
        debug_assert!(!self.is_leaf());
        let new_lsb = self.lsb() >> 2;
        let first = self.0 - self.lsb() + new_lsb;
        [
            CellId(first),
            CellId(first + 2 * new_lsb),
            CellId(first + 4 * new_lsb),
            CellId(first + 6 * new_lsb),
        ]
    }

    /// Center of this cell as a unit vector.
    pub fn center_point(self) -> Point {
        let (face, u_range, v_range) = self.uv_bounds();
        let u = (u_range[0] + u_range[1]) / 2.0;
        let v = (v_range[0] + v_range[1]) / 2.0;
        face_uv_to_xyz(face, u, v).normalize()
    }

    /// The four corner points of this cell as unit vectors.
    pub fn vertices(self) -> [Point; 4] {
        let (face, u, v) = self.uv_bounds();
        [
            face_uv_to_xyz(face, u[0], v[0]).normalize(),
            face_uv_to_xyz(face, u[1], v[0]).normalize(),
            face_uv_to_xyz(face, u[1], v[1]).normalize(),
            face_uv_to_xyz(face, u[0], v[1]).normalize(),
        ]
    }

    /// (u, v) bounds of this cell on its face.
    fn uv_bounds(self) -> (u8, [f64; 2], [f64; 2]) {
        let (face, i, j) = self.to_face_ij();
        let size = 1u32 << (MAX_LEVEL - self.level());
        let i_lo = i & !(size - 1);
        let j_lo = j & !(size - 1);
        let max = MAX_SIZE as f64;
        (
            face,
            [st_to_uv(i_lo as f64 / max), st_to_uv((i_lo + size) as f64 / max)],
            [st_to_uv(j_lo as f64 / max), st_to_uv((j_lo + size) as f64 / max)],
        )
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.face(), self.0)
    }
}

fn lsb_for_level(level: u8) -> u64 {
    1u64 << (2 * (MAX_LEVEL - level))
}

/// Projects a unit vector onto its dominant cube face, returning the face
/// index and the (u, v) coordinates on that face.
fn xyz_to_face_uv(p: &Point) -> (u8, f64, f64) {
    let (ax, ay, az) = (p.x.abs(), p.y.abs(), p.z.abs());
    let mut face: u8 = if ax > ay {
        if ax > az { 0 } else { 2 }
    } else if ay > az {
        1
    } else {
        2
    };
    let dominant = match face {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    };
    if dominant < 0.0 {
        face += 3;
    }
    let (u, v) = match face {
        0 => (p.y / p.x, p.z / p.x),
        1 => (-p.x / p.y, p.z / p.y),
        2 => (-p.x / p.z, -p.y / p.z),
        3 => (p.z / p.x, p.y / p.x),
        4 => (p.z / p.y, -p.x / p.y),
        _ => (-p.y / p.z, -p.x / p.z),
    };
    (face, u, v)
}

/// Maps face (u, v) coordinates back to a (non-normalized) point in R^3.
pub(crate) fn face_uv_to_xyz(face: u8, u: f64, v: f64) -> Point {
    match face {
        0 => Point::new(1.0, u, v),
        1 => Point::new(-u, 1.0, v),
        2 => Point::new(-u, -v, 1.0),
        3 => Point::new(-1.0, -v, -u),
        4 => Point::new(v, -1.0, -u),
        _ => Point::new(v, u, -1.0),
    }
}

/// Quadratic projection from face coordinates [-1,1] to cell space [0,1].
/// Compensates for the area distortion of the cube projection so cells at a
/// given level have roughly uniform size across a face.
fn uv_to_st(u: f64) -> f64 {
    if u >= 0.0 {
        0.5 * (1.0 + 3.0 * u).sqrt()
    } else {
        1.0 - 0.5 * (1.0 - 3.0 * u).sqrt()
    }
}

/// Inverse of [`uv_to_st`].
fn st_to_uv(s: f64) -> f64 {
    if s >= 0.5 {
        (1.0 / 3.0) * (4.0 * s * s - 1.0)
    } else {
        (1.0 / 3.0) * (1.0 - 4.0 * (1.0 - s) * (1.0 - s))
    }
}

/// Discretizes cell space [0,1] to a leaf-grid coordinate.
fn st_to_ij(s: f64) -> u32 {
    ((s * MAX_SIZE as f64).floor() as i64).clamp(0, MAX_SIZE as i64 - 1) as u32
}

/// A closed, ordered interval of cell IDs (`start <= end`), the
/// leaf-descendant span of one covering cell truncated to storage level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellId,
    pub end: CellId,
}

impl CellRange {
    pub fn new(start: CellId, end: CellId) -> Self {
        debug_assert!(start <= end);
        CellRange { start, end }
    }

    /// True when `id` falls within the interval, endpoints included.
    pub fn contains(&self, id: CellId) -> bool {
        self.start <= id && id <= self.end
    }
}

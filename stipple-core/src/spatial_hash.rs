//! Uniform-grid spatial hash for minimum-distance queries.

use hashbrown::HashMap;

use crate::geometry::Point;

/// Integer grid cell coordinates.
pub type CellKey = (i64, i64, i64);

/// Insert-only uniform grid over 3D points.
///
/// Each point is bucketed by `floor(coord / cell_size)` on every axis. A query
/// with radius `r <= cell_size` only needs the 3x3x3 block of cells around the
/// query point, since any point within `r` is at most one cell away per axis.
#[derive(Debug, Clone)]
pub struct SpatialHashIndex {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<Point>>,
    len: usize,
}

impl SpatialHashIndex {
    /// Create an index with a fixed cell size.
    ///
    /// Returns `None` unless `cell_size` is finite and positive.
    pub fn try_new(cell_size: f64) -> Option<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return None;
        }
        Some(Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell containing `point`.
    pub fn cell_of(&self, point: &Point) -> CellKey {
        (
            (point.x / self.cell_size).floor() as i64,
            (point.y / self.cell_size).floor() as i64,
            (point.z / self.cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, point: Point) {
        let key = self.cell_of(&point);
        self.cells.entry(key).or_default().push(point);
        self.len += 1;
    }

    /// True iff an inserted point lies strictly closer than `min_distance`.
    ///
    /// Radii larger than the cell size widen the scanned block so the answer
    /// stays exact.
    pub fn has_neighbor_within(&self, point: &Point, min_distance: f64) -> bool {
        if self.len == 0 || !(min_distance > 0.0) {
            return false;
        }

        let reach = ((min_distance / self.cell_size).ceil() as i64).max(1);
        let (cx, cy, cz) = self.cell_of(point);
        let min_distance_sq = min_distance * min_distance;

        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let key = (
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    );
                    let Some(bucket) = self.cells.get(&key) else {
                        continue;
                    };
                    if bucket
                        .iter()
                        .any(|other| (other - point).norm_squared() < min_distance_sq)
                    {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Number of inserted points
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

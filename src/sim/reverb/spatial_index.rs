use std::collections::HashMap;

use crate::Point;

/// Uniform horizontal grid over eigenverb centers.
///
/// With `step` equal to the overlap search radius, every center within that
/// radius of a query point lies in the query cell or one of its 8 neighbors.
pub struct SpatialIndex {
    grid: HashMap<(i64, i64), Vec<usize>>,
    step: f64,
}

impl SpatialIndex {
    /// Largest coordinate-to-step ratio with exact cell arithmetic.
    pub const MAX_CELL_RATIO: f64 = 1e12;

    /// Whether a grid with this `step` can cover centers within `extent` of
    /// the origin on both axes.
    pub fn supports(step: f64, extent: f64) -> bool {
        step.is_finite() && step > 0.0 && extent / step <= Self::MAX_CELL_RATIO
    }

    pub fn new(centers: impl IntoIterator<Item = Point>, step: f64) -> Self {
        let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (idx, center) in centers.into_iter().enumerate() {
            grid.entry(Self::cell(center, step)).or_default().push(idx);
        }
        Self { grid, step }
    }

    fn cell(pos: Point, step: f64) -> (i64, i64) {
        (
            (pos.x / step).floor() as i64,
            (pos.y / step).floor() as i64,
        )
    }

    /// Indices from the cell containing `pos` plus its 8 neighbors.
    pub fn candidates(&self, pos: Point) -> Vec<usize> {
        let (ci, cj) = Self::cell(pos, self.step);

        let mut result = Vec::new();
        for di in -1..=1 {
            for dj in -1..=1 {
                let key = (ci.saturating_add(di), cj.saturating_add(dj));
                if let Some(indices) = self.grid.get(&key) {
                    result.extend_from_slice(indices);
                }
            }
        }
        result
    }

    /// Number of occupied cells.
    pub fn num_cells(&self) -> usize {
        self.grid.len()
    }
}

//! Uniform grid for neighbor candidate lookups
//!
//! The world is cut into cells at least as wide as the perception radius,
//! so every boid within reach of a focal boid sits in the focal cell or one
//! of its eight neighbors. Distances are plain euclidean (no wrap across
//! torus edges), so the 3x3 block is clamped at the world border.
//!
//! Candidates come back sorted by index. The exact cone test then runs over
//! them in the same order as the all-pairs scan, which keeps every sum and
//! therefore every result bit-identical between the two searches.

use glam::DVec2;

use super::boid::{Boid, World};

/// Cap on cells per axis, keeps tiny radii from allocating huge grids
const MAX_CELLS_PER_AXIS: usize = 512;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cols: usize,
    rows: usize,
    cell_width: f64,
    cell_height: f64,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// Grid over `world` whose cells are no narrower than `reach`
    pub fn new(world: &World, reach: f64) -> Self {
        let cols = cells_along(world.width, reach);
        let rows = cells_along(world.height, reach);
        Self {
            cols,
            rows,
            cell_width: world.width / cols as f64,
            cell_height: world.height / rows as f64,
            cells: vec![Vec::new(); cols * rows],
        }
    }

    /// Grid with every boid inserted
    pub fn build(world: &World, reach: f64, boids: &[Boid]) -> Self {
        let mut grid = Self::new(world, reach);
        for (i, boid) in boids.iter().enumerate() {
            grid.insert(i, boid.position);
        }
        grid
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    #[inline]
    fn cell_of(&self, position: DVec2) -> (usize, usize) {
        // `as usize` saturates: negatives and NaN land in cell 0
        let col = ((position.x / self.cell_width) as usize).min(self.cols - 1);
        let row = ((position.y / self.cell_height) as usize).min(self.rows - 1);
        (col, row)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    pub fn insert(&mut self, index: usize, position: DVec2) {
        let (col, row) = self.cell_of(position);
        self.cells[row * self.cols + col].push(index);
    }

    /// Indices in the 3x3 block around `position`, ascending, into `out`
    pub fn candidates(&self, position: DVec2, out: &mut Vec<usize>) {
        out.clear();
        let (col, row) = self.cell_of(position);

        for r in row.saturating_sub(1)..=(row + 1).min(self.rows - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(self.cols - 1) {
                out.extend_from_slice(&self.cells[r * self.cols + c]);
            }
        }
        out.sort_unstable();
    }
}

/// Cells along an axis of length `extent` for perception radius `reach`.
///
/// One cell is dropped from the exact fit so cells are strictly wider than
/// the reach and boundary rounding can't hide a neighbor two cells away.
fn cells_along(extent: f64, reach: f64) -> usize {
    let fit = (extent / reach).floor();
    if !fit.is_finite() {
        return if fit > 0.0 { MAX_CELLS_PER_AXIS } else { 1 };
    }
    (fit as usize).saturating_sub(1).clamp(1, MAX_CELLS_PER_AXIS)
}

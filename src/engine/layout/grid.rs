//! Uniform grid for candidate-pair lookup in the collision force.

use std::collections::HashMap;

/// Grid-based spatial index over 2-D points.
///
/// Divides the plane into square cells and stores point indices per cell.
/// Any two points closer than the cell size lie in the same or adjacent
/// cells.
#[derive(Debug)]
pub struct SpatialGrid {
    inv_cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    /// # Panics
    ///
    /// Panics if `cell_size` is not positive and finite.
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size > 0.0 && cell_size.is_finite(),
            "Cell size must be positive"
        );
        Self {
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn from_positions(positions: &[[f64; 2]], cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, pos) in positions.iter().enumerate() {
            grid.insert(idx, *pos);
        }
        grid
    }

    fn cell_coords(&self, pos: [f64; 2]) -> (i64, i64) {
        (
            (pos[0] * self.inv_cell_size).floor() as i64,
            (pos[1] * self.inv_cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, idx: usize, pos: [f64; 2]) {
        let cell = self.cell_coords(pos);
        self.cells.entry(cell).or_default().push(idx);
    }

    /// Indices stored in the cell containing `pos` and its eight neighbors.
    pub fn candidates(&self, pos: [f64; 2]) -> Vec<usize> {
        let (cx, cy) = self.cell_coords(pos);
        let mut out = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) {
                    out.extend_from_slice(indices);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid() {
        let grid = SpatialGrid::new(2.0);
        assert!(grid.candidates([0.0, 0.0]).is_empty());
    }

    #[test]
    fn near_points_are_candidates() {
        let positions = vec![[0.5, 0.5], [2.5, 0.5], [10.0, 10.0]];
        let grid = SpatialGrid::from_positions(&positions, 2.0);
        let mut found = grid.candidates([0.0, 0.0]);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn negative_coordinates() {
        let positions = vec![[-0.1, -0.1], [0.1, 0.1]];
        let grid = SpatialGrid::from_positions(&positions, 1.0);
        let mut found = grid.candidates([-0.1, -0.1]);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    #[should_panic(expected = "Cell size must be positive")]
    fn zero_cell_size_panics() {
        SpatialGrid::new(0.0);
    }
}

//! Mapping between grid cells and world coordinates.

use glam::Vec2;

use crate::geometry::Cell;

/// Converts between cells and the caller's world units
pub trait CellTransform {
    /// World position of a cell's center
    fn cell_to_world(&self, cell: Cell) -> Vec2;
    /// Cell containing a world position
    fn world_to_cell(&self, pos: Vec2) -> Cell;
}

/// Square cells of a fixed size, with cell (0, 0) starting at `origin`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformTransform {
    pub origin: Vec2,
    pub cell_size: f32,
}

impl UniformTransform {
    pub fn new(origin: Vec2, cell_size: f32) -> Self {
        Self { origin, cell_size }
    }
}

impl Default for UniformTransform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

impl CellTransform for UniformTransform {
    fn cell_to_world(&self, cell: Cell) -> Vec2 {
        self.origin + (Vec2::new(cell.0 as f32, cell.1 as f32) + Vec2::splat(0.5)) * self.cell_size
    }

    fn world_to_cell(&self, pos: Vec2) -> Cell {
        let local = ((pos - self.origin) / self.cell_size).floor();
        (local.x as i32, local.y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_centers_map_back() {
        let t = UniformTransform::new(Vec2::new(-8.0, 4.0), 2.0);
        for cell in [(0, 0), (3, -2), (-5, 7)] {
            assert_eq!(t.world_to_cell(t.cell_to_world(cell)), cell);
        }
        assert_eq!(t.cell_to_world((0, 0)), Vec2::new(-7.0, 5.0));
    }

    #[test]
    fn test_negative_positions_floor() {
        let t = UniformTransform::default();
        assert_eq!(t.world_to_cell(Vec2::new(-0.25, 0.75)), (-1, 0));
    }
}

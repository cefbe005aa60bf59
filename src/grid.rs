//! Traversability grid built from placed rooms.
//!
//! The grid is immutable once built and may be shared by any number of path
//! queries; per-search scratch lives in the `Pathfinder`.

use crate::geometry::{Cell, Rect};
use crate::occupancy::OccupancyOracle;
use crate::placed_room::PlacedRoom;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// World-space rectangle the grid covers
    bounds: Rect,
    pub width: usize,
    pub height: usize,
    /// Row-major walkability, `true` = traversable
    walkable: Vec<bool>,
}

impl Grid {
    /// Build a grid covering every placed room (plus the oracle's extra area).
    ///
    /// Every cell starts blocked and is opened only where the oracle reports
    /// floor with nothing standing on it.
    pub fn build(oracle: &impl OccupancyOracle, rooms: &[PlacedRoom]) -> Self {
        puffin::profile_function!();

        let mut bounds = rooms
            .iter()
            .map(|r| oracle.footprint_bounds(r))
            .fold(Rect::new(0, 0, 0, 0), |acc, r| acc.union(&r));
        if let Some(extra) = oracle.extra_bounds() {
            bounds = bounds.union(&extra);
        }

        Self::from_fn(bounds, |cell| oracle.is_walkable(rooms, cell))
    }

    /// Build a grid over `bounds` asking `walkable` about each cell
    pub fn from_fn(bounds: Rect, mut walkable: impl FnMut(Cell) -> bool) -> Self {
        let width = bounds.width.max(0) as usize;
        let height = bounds.height.max(0) as usize;
        let mut cells = vec![false; width * height];
        for (i, cell) in bounds.cells().enumerate() {
            cells[i] = walkable(cell);
        }
        Self {
            bounds,
            width,
            height,
            walkable: cells,
        }
    }

    /// Build a grid from rows of characters, `.` walkable and anything else blocked.
    /// Handy for tests and debugging.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as i32;
        let bounds = Rect::new(0, 0, width, height);
        Self::from_fn(bounds, |(x, y)| {
            rows[y as usize].as_bytes().get(x as usize) == Some(&b'.')
        })
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.walkable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walkable.is_empty()
    }

    /// Row-major index of a world cell, if it is inside the grid
    #[inline]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        let x = cell.0 - self.bounds.x;
        let y = cell.1 - self.bounds.y;
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// World cell for a row-major index
    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        (
            self.bounds.x + (index % self.width) as i32,
            self.bounds.y + (index / self.width) as i32,
        )
    }

    pub fn get(&self, x: i32, y: i32) -> Option<bool> {
        self.index((x, y)).map(|i| self.walkable[i])
    }

    /// Out-of-grid cells are never walkable
    #[inline]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.get(cell.0, cell.1).unwrap_or(false)
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }
}

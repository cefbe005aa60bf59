//! Grid geometry shared by placement and pathfinding.

use serde::{Deserialize, Serialize};

/// A grid cell as `(x, y)`. `x` grows to the right, `y` grows downward.
pub type Cell = (i32, i32);

/// Manhattan distance between two cells
#[inline]
pub fn manhattan(a: Cell, b: Cell) -> u32 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Chebyshev (king-move) distance between two cells
#[inline]
pub fn chebyshev(a: Cell, b: Cell) -> u32 {
    a.0.abs_diff(b.0).max(a.1.abs_diff(b.1))
}

/// An axis-aligned rectangle of cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The smallest rectangle containing a single cell
    pub fn from_cell(cell: Cell) -> Self {
        Self::new(cell.0, cell.1, 1, 1)
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Check if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True when the two rectangles share at least one cell
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow the rectangle by `margin` cells on every side
    pub fn expanded(&self, margin: i32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2,
            self.height + margin * 2,
        )
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Iterate every cell in row-major order
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let (x0, x1) = (self.x, self.right());
        (self.y..self.bottom()).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

/// One of the four cardinal sides of a room
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    /// Position of this side in `Side::ALL`
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
            Side::Top => 2,
            Side::Bottom => 3,
        }
    }

    /// Unit step pointing out of a room through this side
    pub fn offset(self) -> (i32, i32) {
        match self {
            Side::Left => (-1, 0),
            Side::Right => (1, 0),
            Side::Top => (0, -1),
            Side::Bottom => (0, 1),
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    /// Step one cell from `cell` in this direction
    #[inline]
    pub fn step(self, cell: Cell) -> Cell {
        let (dx, dy) = self.offset();
        (cell.0 + dx, cell.1 + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(0, 0, 10, 10);
        assert_eq!(rect.center(), (5, 5));

        let rect2 = Rect::new(5, 5, 4, 6);
        assert_eq!(rect2.center(), (7, 8));
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(5, 0, 5, 5);
        assert!(!a.intersects(&b));
        assert!(a.expanded(1).intersects(&b));
    }

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(2, 2, 3, 3);
        let b = Rect::new(10, -1, 2, 2);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(2, -1, 10, 6));
        assert!(u.contains_rect(&a) && u.contains_rect(&b));
        assert_eq!(Rect::new(0, 0, 0, 0).union(&a), a);
    }

    #[test]
    fn test_cells_row_major() {
        let cells: Vec<Cell> = Rect::new(1, 1, 2, 2).cells().collect();
        assert_eq!(cells, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_cells_outlive_the_rect() {
        let cells = {
            let rect = Rect::new(0, 0, 3, 2);
            rect.cells()
        };
        assert_eq!(cells.count(), 6);
        assert_eq!(Rect::new(4, 4, 0, 3).cells().count(), 0);
    }

    #[test]
    fn test_side_opposites_cancel() {
        for side in Side::ALL {
            let (dx, dy) = side.offset();
            let (ox, oy) = side.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(Side::ALL[side.index()], side);
        }
    }

    #[test]
    fn test_distances() {
        assert_eq!(manhattan((0, 0), (3, -4)), 7);
        assert_eq!(chebyshev((0, 0), (3, -4)), 4);
    }
}

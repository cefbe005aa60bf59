//! The query surface the pathfinder uses to learn what stands on each cell.
//!
//! The core never looks at rendering data; anything that can answer these
//! questions about placed rooms can drive grid construction.

use crate::catalog::TemplateCell;
use crate::geometry::{Cell, Rect};
use crate::placed_room::PlacedRoom;

/// What occupies a cell as far as movement is concerned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellClass {
    /// Nothing here: outside every room and corridor
    Void,
    Floor,
    Wall,
    /// Floor covered by a prop or interactable that blocks movement
    Blocked,
}

impl CellClass {
    #[inline]
    pub fn is_walkable(self) -> bool {
        self == CellClass::Floor
    }
}

impl From<TemplateCell> for CellClass {
    fn from(cell: TemplateCell) -> Self {
        match cell {
            TemplateCell::Void => CellClass::Void,
            TemplateCell::Floor => CellClass::Floor,
            TemplateCell::Wall => CellClass::Wall,
            TemplateCell::Prop => CellClass::Blocked,
        }
    }
}

/// Geometry oracle for placed rooms and freestanding corridor floor
pub trait OccupancyOracle {
    /// Cell-bounding box of a room's footprint
    fn footprint_bounds(&self, room: &PlacedRoom) -> Rect {
        room.rect()
    }

    /// What a room has at the given cell
    fn classify(&self, room: &PlacedRoom, cell: Cell) -> CellClass {
        room.cell_kind(cell).into()
    }

    /// True for corridor floor that lies outside every room
    fn is_corridor_floor(&self, cell: Cell) -> bool;

    /// Area outside the room footprints that may hold walkable cells
    fn extra_bounds(&self) -> Option<Rect> {
        None
    }

    /// Combine every source into one walkability answer.
    ///
    /// A wall or prop from any room wins over floor; otherwise the cell is
    /// walkable if some room or corridor provides floor there.
    fn is_walkable(&self, rooms: &[PlacedRoom], cell: Cell) -> bool {
        let mut floor = false;
        for room in rooms {
            if !self.footprint_bounds(room).contains(cell.0, cell.1) {
                continue;
            }
            match self.classify(room, cell) {
                CellClass::Floor => floor = true,
                CellClass::Void => {}
                CellClass::Wall | CellClass::Blocked => return false,
            }
        }
        floor || self.is_corridor_floor(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoomTemplate;
    use crate::room_graph::{RoomId, RoomType};
    use std::collections::HashSet;

    struct Corridors(HashSet<Cell>);

    impl OccupancyOracle for Corridors {
        fn is_corridor_floor(&self, cell: Cell) -> bool {
            self.0.contains(&cell)
        }
    }

    #[test]
    fn test_walls_and_props_block() {
        let template =
            RoomTemplate::parse("t", &["#####", "#...#", "#.o.#", "#...#", "#####"]).unwrap();
        let room = PlacedRoom::new(RoomId(0), RoomType::entrance(), template, (0, 0));
        let oracle = Corridors(HashSet::from([(5, 2), (0, 2)]));
        let rooms = [room];

        assert!(oracle.is_walkable(&rooms, (1, 1)));
        assert!(!oracle.is_walkable(&rooms, (2, 2)));
        assert!(!oracle.is_walkable(&rooms, (0, 0)));
        // Corridor floor outside the room is walkable
        assert!(oracle.is_walkable(&rooms, (5, 2)));
        // ...but not where the room says wall
        assert!(!oracle.is_walkable(&rooms, (0, 2)));
        assert!(!oracle.is_walkable(&rooms, (8, 8)));
    }
}

//! Rooms that have been given a position on the level grid.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{RoomTemplate, TemplateCell};
use crate::geometry::{Cell, Rect, Side};
use crate::room_graph::{RoomId, RoomType};

/// Which cardinal sides of a room already carry a corridor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeTracker {
    used: [bool; 4],
}

impl EdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, side: Side) -> bool {
        self.used[side.index()]
    }

    /// Mark a side as carrying a corridor
    pub fn consume(&mut self, side: Side) {
        self.used[side.index()] = true;
    }

    /// Sides still free, in `Side::ALL` order
    pub fn available(&self) -> Vec<Side> {
        Side::ALL.into_iter().filter(|s| !self.is_used(*s)).collect()
    }

    pub fn available_count(&self) -> usize {
        self.used.iter().filter(|u| !**u).count()
    }

    /// Pick a random free side
    pub fn pick_available(&self, rng: &mut impl Rng) -> Option<Side> {
        self.available().choose(rng).copied()
    }
}

/// A room node stamped onto the grid with a concrete template
#[derive(Clone, Debug)]
pub struct PlacedRoom {
    pub id: RoomId,
    pub room_type: RoomType,
    template: RoomTemplate,
    /// Top-left cell of the footprint
    anchor: Cell,
    /// Wall cells opened up by corridors
    doors: Vec<(Side, Cell)>,
    pub edges: EdgeTracker,
}

impl PlacedRoom {
    pub fn new(id: RoomId, room_type: RoomType, template: RoomTemplate, anchor: Cell) -> Self {
        Self {
            id,
            room_type,
            template,
            anchor,
            doors: Vec::new(),
            edges: EdgeTracker::new(),
        }
    }

    pub fn anchor(&self) -> Cell {
        self.anchor
    }

    pub fn template(&self) -> &RoomTemplate {
        &self.template
    }

    /// Cell-bounding box of the footprint
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.anchor.0,
            self.anchor.1,
            self.template.width(),
            self.template.height(),
        )
    }

    pub fn doors(&self) -> &[(Side, Cell)] {
        &self.doors
    }

    pub fn is_door(&self, cell: Cell) -> bool {
        self.doors.iter().any(|(_, d)| *d == cell)
    }

    /// Open a door in the wall and mark its side as used.
    pub fn add_door(&mut self, side: Side, cell: Cell) {
        self.doors.push((side, cell));
        self.edges.consume(side);
    }

    /// True if the cell is part of this room (void template cells are not)
    pub fn occupies(&self, cell: Cell) -> bool {
        self.cell_kind(cell) != TemplateCell::Void
    }

    /// What the room has at a world cell. Open doors read as floor.
    pub fn cell_kind(&self, cell: Cell) -> TemplateCell {
        if self.is_door(cell) {
            return TemplateCell::Floor;
        }
        self.template
            .cell(cell.0 - self.anchor.0, cell.1 - self.anchor.1)
    }

    /// Every occupied world cell
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.rect().cells().filter(move |c| self.occupies(*c))
    }

    /// Doorway candidates on one side, in world coordinates
    pub fn doorways(&self, side: Side) -> Vec<Cell> {
        self.template
            .doorways(side)
            .iter()
            .map(|(x, y)| (self.anchor.0 + x, self.anchor.1 + y))
            .collect()
    }

    /// Midpoint of one side, used to compare side-to-side distances
    pub fn side_midpoint(&self, side: Side) -> (f32, f32) {
        let r = self.rect();
        let (x, y, w, h) = (r.x as f32, r.y as f32, r.width as f32, r.height as f32);
        match side {
            Side::Left => (x, y + h / 2.0),
            Side::Right => (x + w - 1.0, y + h / 2.0),
            Side::Top => (x + w / 2.0, y),
            Side::Bottom => (x + w / 2.0, y + h - 1.0),
        }
    }

    /// The floor cell nearest the room's center
    pub fn central_floor(&self) -> Option<Cell> {
        self.template
            .central_floor()
            .map(|(x, y)| (self.anchor.0 + x, self.anchor.1 + y))
    }
}

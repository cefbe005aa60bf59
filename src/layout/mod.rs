//! Turning a room graph into placed rooms joined by corridors.
//!
//! Two strategies share one retry ladder:
//!
//! - **Graph budget** grows the level outward from the entrance. Each room
//!   has four sides and each side carries at most one corridor, so a room can
//!   never be asked for more connections than it has sides.
//! - **Area** scatters rooms at random non-overlapping positions first and
//!   then joins every graph edge through the closest pair of free sides.
//!
//! Inside one attempt the solver retries positions, then template variants.
//! When those run out the attempt is thrown away whole and a new one starts
//! from a fresh sub-seed. Nothing partial ever leaves this module.

mod area;
mod corridor;
mod graph_budget;

use std::collections::{HashSet, VecDeque};

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::catalog::{RoomCatalog, RoomTemplate};
use crate::config::{LayoutConfig, PlacementStrategy};
use crate::error::{GraphError, LayoutError};
use crate::geometry::{Cell, Rect, Side};
use crate::occupancy::OccupancyOracle;
use crate::placed_room::PlacedRoom;
use crate::room_graph::{RoomGraph, RoomId, RoomNode};

/// Area rooms are placed in and the spacing between them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutBounds {
    pub width: i32,
    pub height: i32,
    /// Minimum number of empty cells between two room footprints
    pub min_gap: i32,
}

impl LayoutBounds {
    pub fn new(width: i32, height: i32, min_gap: i32) -> Self {
        Self {
            width,
            height,
            min_gap,
        }
    }

    /// The bounds stored on the graph itself
    pub fn from_graph(graph: &RoomGraph) -> Self {
        Self::new(graph.width, graph.height, graph.min_gap)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// A carved passage joining two rooms
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Corridor {
    pub from: RoomId,
    pub to: RoomId,
    /// From the cell outside `from`'s door to the cell outside `to`'s door
    pub cells: Vec<Cell>,
}

impl Corridor {
    pub fn joins(&self, a: RoomId, b: RoomId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// The physical result of placement
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub rooms: Vec<PlacedRoom>,
    pub corridors: Vec<Corridor>,
    corridor_cells: HashSet<Cell>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room(&self, id: RoomId) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.id == id)
    }

    fn room_mut(&mut self, id: RoomId) -> Option<&mut PlacedRoom> {
        self.rooms.iter_mut().find(|r| r.id == id)
    }

    pub fn corridor_between(&self, a: RoomId, b: RoomId) -> Option<&Corridor> {
        self.corridors.iter().find(|c| c.joins(a, b))
    }

    pub fn corridor_cells(&self) -> &HashSet<Cell> {
        &self.corridor_cells
    }

    fn add_corridor(&mut self, corridor: Corridor) {
        self.corridor_cells.extend(corridor.cells.iter().copied());
        self.corridors.push(corridor);
    }

    /// True if the cell lies inside any room's footprint rectangle
    pub fn is_room_cell(&self, cell: Cell) -> bool {
        self.rooms.iter().any(|r| r.rect().contains(cell.0, cell.1))
    }

    /// Would a room with this footprint be legal here?
    ///
    /// It must sit inside the bounds, keep `min_gap` cells away from every
    /// placed room and cover no corridor.
    pub fn fits(&self, rect: &Rect, bounds: &LayoutBounds) -> bool {
        if !bounds.rect().contains_rect(rect) {
            return false;
        }
        if self
            .rooms
            .iter()
            .any(|r| r.rect().expanded(bounds.min_gap).intersects(rect))
        {
            return false;
        }
        !rect.cells().any(|c| self.corridor_cells.contains(&c))
    }

    /// Open a door on a placed room; false if the room is unknown
    fn open_door(&mut self, id: RoomId, side: Side, door: Cell) -> bool {
        match self.room_mut(id) {
            Some(room) => {
                room.add_door(side, door);
                true
            }
            None => false,
        }
    }
}

impl OccupancyOracle for Layout {
    fn is_corridor_floor(&self, cell: Cell) -> bool {
        self.corridor_cells.contains(&cell)
    }

    fn extra_bounds(&self) -> Option<Rect> {
        self.corridor_cells
            .iter()
            .map(|c| Rect::from_cell(*c))
            .reduce(|a, b| a.union(&b))
    }
}

/// Why a single attempt was abandoned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlacementFailure {
    #[error("room {room} needs {needed} corridors but has {available} free sides")]
    InsufficientEdges {
        room: RoomId,
        needed: usize,
        available: usize,
    },

    #[error("no variant of room {room} fit anywhere")]
    PrefabBudget { room: RoomId },

    #[error("no corridor could join {from} and {to}")]
    CorridorBlocked { from: RoomId, to: RoomId },

    #[error("room {0} was expected to be placed already")]
    NotPlaced(RoomId),
}

/// Everything one attempt needs to read
pub(crate) struct PlacementContext<'a> {
    pub catalog: &'a RoomCatalog,
    pub config: &'a LayoutConfig,
    pub bounds: LayoutBounds,
}

impl PlacementContext<'_> {
    /// Random anchor keeping the template inside the bounds
    fn random_anchor(&self, template: &RoomTemplate, rng: &mut impl Rng) -> Option<Cell> {
        let max_x = self.bounds.width - template.width();
        let max_y = self.bounds.height - template.height();
        if max_x < 0 || max_y < 0 {
            return None;
        }
        Some((rng.gen_range(0..=max_x), rng.gen_range(0..=max_y)))
    }

    /// Drop a room at a random legal position, trying several variants
    fn scatter(
        &self,
        layout: &mut Layout,
        node: &RoomNode,
        rng: &mut impl Rng,
    ) -> Result<(), PlacementFailure> {
        let prefab = PlacementFailure::PrefabBudget { room: node.id };
        let mut variants: Vec<&RoomTemplate> = match self.catalog.variants(&node.room_type) {
            Ok(list) => list.iter().collect(),
            Err(_) => return Err(prefab),
        };
        variants.shuffle(rng);

        for template in variants.into_iter().take(self.config.prefab_attempts as usize) {
            for _ in 0..self.config.position_attempts {
                let Some(anchor) = self.random_anchor(template, rng) else {
                    break;
                };
                let rect = Rect::new(anchor.0, anchor.1, template.width(), template.height());
                if layout.fits(&rect, &self.bounds) {
                    layout.rooms.push(PlacedRoom::new(
                        node.id,
                        node.room_type.clone(),
                        template.clone(),
                        anchor,
                    ));
                    return Ok(());
                }
            }
        }
        Err(prefab)
    }
}

/// Places a room graph using the configured strategy and retry ladder
pub struct LayoutSolver<'a> {
    catalog: &'a RoomCatalog,
    config: LayoutConfig,
}

impl<'a> LayoutSolver<'a> {
    pub fn new(catalog: &'a RoomCatalog, config: LayoutConfig) -> Self {
        Self { catalog, config }
    }

    /// Place every room of `graph` inside `bounds`.
    ///
    /// Malformed input fails immediately; a valid graph that cannot be laid
    /// out within the attempt budget fails with `LayoutError::Exhausted`.
    pub fn place(
        &self,
        graph: &RoomGraph,
        bounds: LayoutBounds,
        rng: &mut impl Rng,
    ) -> Result<Layout, LayoutError> {
        puffin::profile_function!();

        let entrance = self.check_input(graph, &bounds)?;
        let ctx = PlacementContext {
            catalog: self.catalog,
            config: &self.config,
            bounds,
        };

        let attempts = self.config.generation_attempts.max(1);
        for attempt in 1..=attempts {
            let seed: u64 = rng.gen();
            let mut attempt_rng = ChaCha8Rng::seed_from_u64(seed);

            let result = match self.config.strategy {
                PlacementStrategy::GraphBudget => {
                    graph_budget::place(&ctx, graph, entrance, &mut attempt_rng)
                }
                PlacementStrategy::Area => area::place(&ctx, graph, &mut attempt_rng),
            };

            match result {
                Ok(layout) => {
                    info!(
                        "placed {} rooms and {} corridors on attempt {attempt}/{attempts}",
                        layout.rooms.len(),
                        layout.corridors.len()
                    );
                    return Ok(layout);
                }
                Err(failure) => {
                    debug!("layout attempt {attempt}/{attempts} (seed {seed}) failed: {failure}");
                }
            }
        }

        Err(LayoutError::Exhausted { attempts })
    }

    /// Reject input no amount of retrying could fix. Returns the entrance.
    fn check_input(&self, graph: &RoomGraph, bounds: &LayoutBounds) -> Result<RoomId, LayoutError> {
        if graph.is_empty() {
            return Err(LayoutError::EmptyGraph);
        }
        if bounds.width <= 0 || bounds.height <= 0 || bounds.min_gap < 0 {
            return Err(LayoutError::InvalidBounds {
                width: bounds.width,
                height: bounds.height,
                min_gap: bounds.min_gap,
            });
        }
        graph.validate()?;
        let entrance = graph.entrance()?;
        for node in graph.nodes() {
            self.catalog.variants(&node.room_type)?;
        }
        if self.config.strategy == PlacementStrategy::GraphBudget {
            check_reachable(graph, entrance)?;
        }
        Ok(entrance)
    }
}

/// Growing from the entrance can only place rooms it can reach
fn check_reachable(graph: &RoomGraph, entrance: RoomId) -> Result<(), GraphError> {
    let mut seen = HashSet::from([entrance]);
    let mut queue = VecDeque::from([entrance]);
    while let Some(id) = queue.pop_front() {
        let node = graph.node(id).ok_or(GraphError::UnknownNode(id))?;
        for &n in node.neighbors() {
            if seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    match graph.nodes().iter().find(|n| !seen.contains(&n.id)) {
        Some(node) => Err(GraphError::Unreachable(node.id)),
        None => Ok(()),
    }
}

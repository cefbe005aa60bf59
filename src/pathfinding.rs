//! A* search over the traversability grid.
//!
//! Movement is 8-directional by default with every step costing 1. A diagonal
//! step is only allowed when both orthogonal cells beside it are walkable, so
//! paths never clip through the corner of a wall. The open set is a `MinHeap`
//! ordered by `f`, then by `h`, whose keys are lowered in place when a cheaper
//! route to a queued cell turns up.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{CARDINAL_OFFSETS, DIAGONAL_OFFSETS, PATH_STEP_COST};
use crate::geometry::{chebyshev, manhattan, Cell};
use crate::grid::Grid;
use crate::min_heap::MinHeap;
use crate::transform::CellTransform;

/// Which neighbors a step may reach
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    /// Orthogonal and diagonal neighbors
    #[default]
    EightWay,
    /// Orthogonal neighbors only
    Cardinal,
}

/// Distance estimate used to order the open set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Exact lower bound for cardinal movement, but overestimates once
    /// diagonals are allowed, so 8-way searches may return longer paths
    Manhattan,
    /// Never overestimates under either movement, so paths are always shortest
    #[default]
    Chebyshev,
}

impl Heuristic {
    #[inline]
    pub fn estimate(self, from: Cell, to: Cell) -> u32 {
        match self {
            Heuristic::Manhattan => manhattan(from, to),
            Heuristic::Chebyshev => chebyshev(from, to),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub movement: Movement,
    #[serde(default)]
    pub heuristic: Heuristic,
}

impl SearchOptions {
    /// Four-way movement; Manhattan is exact-or-under here
    pub fn cardinal() -> Self {
        Self {
            movement: Movement::Cardinal,
            heuristic: Heuristic::Manhattan,
        }
    }
}

/// Open-set ordering: lowest `f`, then lowest `h`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct PathKey {
    f: u32,
    h: u32,
}

/// Per-cell search state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathNode {
    /// Cost from the start along the best known route
    pub g: u32,
    /// Estimated cost to the goal
    pub h: u32,
    pub f: u32,
    /// Index of the previous cell on the best known route
    pub prev: Option<usize>,
    pub closed: bool,
}

impl Default for PathNode {
    fn default() -> Self {
        Self {
            g: u32::MAX,
            h: 0,
            f: u32::MAX,
            prev: None,
            closed: false,
        }
    }
}

/// A route from start to goal, both included
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub cells: Vec<Cell>,
    pub cost: u32,
}

impl Path {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell after the start, if the path moves at all
    pub fn first_step(&self) -> Option<Cell> {
        self.cells.get(1).copied()
    }
}

/// Reusable A* scratch space.
///
/// The grid is only read; each searcher owns its own `Pathfinder`, so
/// concurrent queries against one grid never share node state.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    options: SearchOptions,
    nodes: Vec<PathNode>,
    open: MinHeap<PathKey>,
}

impl Pathfinder {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            open: MinHeap::new(),
        }
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Find a path from start to goal.
    /// Returns None if no path exists or either end is not walkable.
    pub fn find_path(&mut self, grid: &Grid, start: Cell, goal: Cell) -> Option<Path> {
        puffin::profile_function!();

        let start_idx = grid.index(start)?;
        let goal_idx = grid.index(goal)?;
        if !grid.is_walkable(start) || !grid.is_walkable(goal) {
            return None;
        }
        if start_idx == goal_idx {
            return Some(Path {
                cells: vec![start],
                cost: 0,
            });
        }

        self.reset(grid.len());
        let heuristic = self.options.heuristic;

        let h = heuristic.estimate(start, goal);
        self.nodes[start_idx] = PathNode {
            g: 0,
            h,
            f: h,
            prev: None,
            closed: false,
        };
        self.open.push(start_idx, PathKey { f: h, h });

        let offsets: &[(i32, i32)] = match self.options.movement {
            Movement::EightWay => &ALL_OFFSETS,
            Movement::Cardinal => &CARDINAL_OFFSETS,
        };

        while let Some((current, _)) = self.open.pop() {
            if current == goal_idx {
                return Some(Path {
                    cells: self.reconstruct(grid, current),
                    cost: self.nodes[current].g,
                });
            }
            self.nodes[current].closed = true;

            let (x, y) = grid.cell_at(current);
            let current_g = self.nodes[current].g;

            for &(dx, dy) in offsets {
                let next = (x + dx, y + dy);
                let Some(next_idx) = grid.index(next) else {
                    continue;
                };
                if !grid.is_walkable(next) {
                    continue;
                }
                // No cutting corners: both orthogonal cells must be open
                if dx != 0
                    && dy != 0
                    && (!grid.is_walkable((x + dx, y)) || !grid.is_walkable((x, y + dy)))
                {
                    continue;
                }

                let tentative_g = current_g + PATH_STEP_COST;
                let node = &mut self.nodes[next_idx];
                if tentative_g >= node.g {
                    continue;
                }

                let h = heuristic.estimate(next, goal);
                *node = PathNode {
                    g: tentative_g,
                    h,
                    f: tentative_g + h,
                    prev: Some(current),
                    closed: false,
                };
                // Updates the key in place if the cell is already queued
                self.open.push(next_idx, PathKey { f: tentative_g + h, h });
            }
        }

        None // No path found
    }

    fn reset(&mut self, len: usize) {
        self.open.clear();
        self.nodes.clear();
        self.nodes.resize(len, PathNode::default());
    }

    /// Walk the back-pointers from the goal and reverse
    fn reconstruct(&self, grid: &Grid, goal_idx: usize) -> Vec<Cell> {
        let mut path = vec![grid.cell_at(goal_idx)];
        let mut current = goal_idx;
        while let Some(prev) = self.nodes[current].prev {
            path.push(grid.cell_at(prev));
            current = prev;
        }
        path.reverse();
        path
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

const ALL_OFFSETS: [(i32, i32); 8] = [
    CARDINAL_OFFSETS[0],
    CARDINAL_OFFSETS[1],
    CARDINAL_OFFSETS[2],
    CARDINAL_OFFSETS[3],
    DIAGONAL_OFFSETS[0],
    DIAGONAL_OFFSETS[1],
    DIAGONAL_OFFSETS[2],
    DIAGONAL_OFFSETS[3],
];

/// Shortest path with default options (8-way, Chebyshev) and fresh scratch space.
pub fn find_path(grid: &Grid, start: Cell, goal: Cell) -> Option<Path> {
    Pathfinder::default().find_path(grid, start, goal)
}

/// Get just the next step toward a goal.
/// Returns None if no path exists or already at goal.
pub fn next_step_toward(grid: &Grid, start: Cell, goal: Cell) -> Option<Cell> {
    if start == goal {
        return None;
    }

    find_path(grid, start, goal).and_then(|path| path.first_step())
}

/// Path between two world positions, returned as cell centers in world units.
pub fn find_world_path(
    pathfinder: &mut Pathfinder,
    grid: &Grid,
    transform: &impl CellTransform,
    from: Vec2,
    to: Vec2,
) -> Option<Vec<Vec2>> {
    let start = transform.world_to_cell(from);
    let goal = transform.world_to_cell(to);
    let path = pathfinder.find_path(grid, start, goal)?;
    Some(path.cells.into_iter().map(|c| transform.cell_to_world(c)).collect())
}

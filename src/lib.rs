//! Graph-driven dungeon generation.
//!
//! An authored [`RoomGraph`] says which rooms exist and which must connect.
//! Generation runs in three stages:
//!
//! 1. [`GraphRewriter`] optionally expands the graph with replacement rules.
//! 2. [`LayoutSolver`] gives every room a template and a position and carves
//!    a corridor for every edge.
//! 3. [`Grid::build`] turns the placed rooms into a walkability grid that
//!    [`Pathfinder`] searches.
//!
//! [`generate_level`] runs all three.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod level;
pub mod min_heap;
pub mod occupancy;
pub mod pathfinding;
pub mod placed_room;
pub mod rewrite;
pub mod rng;
pub mod room_graph;
pub mod transform;

pub use catalog::{RoomCatalog, RoomTemplate, TemplateCell};
pub use config::{GenerationConfig, LayoutConfig, PlacementStrategy, RewriteConfig};
pub use error::{GenerationError, GraphError, LayoutError, LevelFileError, RewriteError, TemplateError};
pub use generation::{generate_level, GeneratedLevel};
pub use geometry::{Cell, Rect, Side};
pub use grid::Grid;
pub use layout::{Corridor, Layout, LayoutBounds, LayoutSolver};
pub use level::LevelFile;
pub use occupancy::{CellClass, OccupancyOracle};
pub use pathfinding::{find_path, find_world_path, next_step_toward, Heuristic, Movement, Path, Pathfinder, SearchOptions};
pub use placed_room::{EdgeTracker, PlacedRoom};
pub use rewrite::{GraphRewriter, RewriteRule, RuleSet};
pub use rng::GenRng;
pub use room_graph::{clone_graph, RoomGraph, RoomId, RoomNode, RoomType};
pub use transform::{CellTransform, UniformTransform};

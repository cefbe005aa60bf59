//! Error types for generation and loading.
//!
//! Structural problems (bad graphs, bad rules, bad templates) are reported
//! distinctly from a layout that simply ran out of attempts. A missing path is
//! never an error; the pathfinder returns `None` for it.

use thiserror::Error;

use crate::geometry::Side;
use crate::room_graph::{RoomId, RoomType};

/// Problems with the shape of a room graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("graph has no Entrance room")]
    MissingEntrance,

    #[error("graph has {count} Entrance rooms, expected exactly one")]
    MultipleEntrances { count: usize },

    #[error("room id {0} appears more than once")]
    DuplicateId(RoomId),

    #[error("edge references unknown room {0}")]
    UnknownNode(RoomId),

    #[error("room {0} is connected to itself")]
    SelfLoop(RoomId),

    #[error("rooms {0} and {1} are connected more than once")]
    DuplicateEdge(RoomId, RoomId),

    #[error("room {a} lists {b} as a neighbor but not the other way around")]
    Asymmetric { a: RoomId, b: RoomId },

    #[error("room {0} cannot be reached from the Entrance")]
    Unreachable(RoomId),
}

/// Problems raised while rewriting a graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("rule '{rule}' names head {head}, which is not in its replacement graph")]
    MissingHead { rule: String, head: RoomId },

    #[error("rule '{rule}' introduces an Entrance while rewriting '{lhs}'")]
    StrayEntrance { rule: String, lhs: RoomType },

    #[error("rule '{rule}' rewrites the Entrance into {count} Entrance rooms, expected exactly one")]
    EntranceNotKept { rule: String, count: usize },
}

/// Problems parsing a room template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{name}' has rows of different widths")]
    NotRectangular { name: String },

    #[error("template '{name}' is {width}x{height}, smaller than the {min}x{min} minimum")]
    TooSmall {
        name: String,
        width: usize,
        height: usize,
        min: usize,
    },

    #[error("template '{name}' uses unknown cell character {ch:?}")]
    UnknownCell { name: String, ch: char },

    #[error("template '{name}' has no doorway on its {side:?} side")]
    NoDoorway { name: String, side: Side },
}

/// Problems placing rooms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("graph has no rooms to place")]
    EmptyGraph,

    #[error("bounds {width}x{height} with gap {min_gap} cannot hold any room")]
    InvalidBounds {
        width: i32,
        height: i32,
        min_gap: i32,
    },

    #[error("no template available for room type '{0}'")]
    MissingTemplate(RoomType),

    #[error("layout failed after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

impl LayoutError {
    /// True for malformed input, false for a valid request that found no layout
    pub fn is_structural(&self) -> bool {
        !matches!(self, LayoutError::Exhausted { .. })
    }
}

/// Problems running the whole generation pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Problems loading a level description from disk
#[derive(Error, Debug)]
pub enum LevelFileError {
    #[error("could not read level file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid level description: {0}")]
    Json(#[from] serde_json::Error),
}

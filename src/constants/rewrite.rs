//! Graph rewriting constants.

/// Chance that a visited node is eligible for rewriting in a pass
pub const REWRITE_PROBABILITY: f64 = 0.8;
/// Largest degree a head node may reach after absorbing a matched node's edges.
/// One edge per cardinal side of a room.
pub const REWRITE_MAX_FAN_OUT: usize = 4;
/// Number of BFS rewrite passes over the graph
pub const REWRITE_PASSES: u32 = 1;

/// Room type name every graph must contain exactly once
pub const ENTRANCE_ROOM_TYPE: &str = "Entrance";

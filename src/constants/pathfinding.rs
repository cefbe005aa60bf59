//! Pathfinding constants.

/// Cost of a single step, orthogonal or diagonal
pub const PATH_STEP_COST: u32 = 1;
/// Orthogonal neighbor offsets, in `Side` order (left, right, top, bottom)
pub const CARDINAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
/// Diagonal neighbor offsets
pub const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

//! Layout solver constants.

/// Random anchors tried for one room variant before giving up on it
pub const LAYOUT_POSITION_ATTEMPTS: u32 = 40;
/// Template variants tried for one room before the attempt aborts
pub const LAYOUT_PREFAB_ATTEMPTS: u32 = 4;
/// Whole-layout attempts before reporting final failure
pub const LAYOUT_GENERATION_ATTEMPTS: u32 = 30;
/// Shortest corridor carved by a random walk (in cells)
pub const CORRIDOR_WALK_MIN: u32 = 4;
/// Longest corridor carved by a random walk (in cells)
pub const CORRIDOR_WALK_MAX: u32 = 10;
/// Step budget for a single random walk, including rejected steps
pub const CORRIDOR_WALK_ITERATION_CAP: u32 = 400;
/// Chance that a connecting walk steps toward its target instead of randomly
pub const CORRIDOR_WALK_BIAS: f64 = 0.75;
/// Chance that an outward walk keeps its current heading
pub const CORRIDOR_WALK_STRAIGHTNESS: f64 = 0.6;

/// Smallest template edge length (walls included)
pub const TEMPLATE_MIN_SIZE: usize = 3;

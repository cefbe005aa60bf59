//! Tunable parameters for generation, loadable from JSON.
//!
//! Every field has a default from `constants`, so a level file only needs to
//! mention what it changes. `{}` is a complete config.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::pathfinding::SearchOptions;

/// How rooms are positioned
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Grow outward from the entrance along graph edges, one corridor per side
    #[default]
    GraphBudget,
    /// Scatter rooms first, then join them along graph edges
    Area,
}

/// Parameters for the graph rewriter
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Chance each visited node is eligible for rewriting
    pub probability: f64,
    /// Head degree limit after splicing
    pub max_fan_out: usize,
    /// Number of BFS passes
    pub passes: u32,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            probability: REWRITE_PROBABILITY,
            max_fan_out: REWRITE_MAX_FAN_OUT,
            passes: REWRITE_PASSES,
        }
    }
}

/// Parameters for the layout solver and its retry ladder
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub strategy: PlacementStrategy,
    pub position_attempts: u32,
    pub prefab_attempts: u32,
    pub generation_attempts: u32,
    pub walk_min: u32,
    pub walk_max: u32,
    pub walk_iteration_cap: u32,
    /// Chance a connecting walk steps toward its target
    pub walk_bias: f64,
    /// Chance an outward walk keeps its heading
    pub walk_straightness: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: PlacementStrategy::default(),
            position_attempts: LAYOUT_POSITION_ATTEMPTS,
            prefab_attempts: LAYOUT_PREFAB_ATTEMPTS,
            generation_attempts: LAYOUT_GENERATION_ATTEMPTS,
            walk_min: CORRIDOR_WALK_MIN,
            walk_max: CORRIDOR_WALK_MAX,
            walk_iteration_cap: CORRIDOR_WALK_ITERATION_CAP,
            walk_bias: CORRIDOR_WALK_BIAS,
            walk_straightness: CORRIDOR_WALK_STRAIGHTNESS,
        }
    }
}

/// Everything the generation pipeline can be tuned with
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub rewrite: RewriteConfig,
    pub layout: LayoutConfig,
    pub pathfinding: SearchOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::{Heuristic, Movement};

    #[test]
    fn test_empty_json_is_default() {
        let config: GenerationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GenerationConfig::default());
        assert_eq!(config.rewrite.probability, REWRITE_PROBABILITY);
        assert_eq!(config.layout.strategy, PlacementStrategy::GraphBudget);
    }

    #[test]
    fn test_partial_overrides() {
        let json = r#"{
            "rewrite": {"probability": 1.0},
            "layout": {"strategy": "area", "generation_attempts": 5},
            "pathfinding": {"heuristic": "manhattan"}
        }"#;
        let config: GenerationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rewrite.probability, 1.0);
        assert_eq!(config.rewrite.max_fan_out, REWRITE_MAX_FAN_OUT);
        assert_eq!(config.layout.strategy, PlacementStrategy::Area);
        assert_eq!(config.layout.generation_attempts, 5);
        assert_eq!(config.layout.position_attempts, LAYOUT_POSITION_ATTEMPTS);
        assert_eq!(config.pathfinding.heuristic, Heuristic::Manhattan);
        assert_eq!(config.pathfinding.movement, Movement::EightWay);
    }
}

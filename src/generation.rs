//! The full generation pipeline: rewrite, place, build the walkable grid.

use log::{info, warn};
use rand::Rng;

use crate::catalog::RoomCatalog;
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::grid::Grid;
use crate::layout::{Layout, LayoutBounds, LayoutSolver};
use crate::pathfinding::Pathfinder;
use crate::rewrite::{GraphRewriter, RuleSet};
use crate::room_graph::{RoomGraph, RoomId};

/// A finished level
#[derive(Clone, Debug)]
pub struct GeneratedLevel {
    /// The graph that was actually placed (after rewriting)
    pub graph: RoomGraph,
    pub layout: Layout,
    pub grid: Grid,
}

impl GeneratedLevel {
    /// A pathfinder set up with the level's search options
    pub fn pathfinder(&self, config: &GenerationConfig) -> Pathfinder {
        Pathfinder::new(config.pathfinding)
    }

    /// Landmark floor cell of a room
    pub fn room_center(&self, id: RoomId) -> Option<(i32, i32)> {
        self.layout.room(id)?.central_floor()
    }
}

/// Rewrite, lay out, and grid a level.
///
/// A graph the rewriter rejects is placed as authored. Layout failures are
/// returned; nothing partial is.
pub fn generate_level(
    graph: &RoomGraph,
    rules: &RuleSet,
    catalog: &RoomCatalog,
    config: &GenerationConfig,
    rng: &mut impl Rng,
) -> Result<GeneratedLevel, GenerationError> {
    puffin::profile_function!();

    let graph = if rules.is_empty() {
        graph.clone()
    } else {
        match GraphRewriter::new(config.rewrite).rewrite(graph, rules, rng) {
            Ok(rewritten) => rewritten,
            Err(e) => {
                warn!("graph rewrite failed, using the authored graph: {e}");
                graph.clone()
            }
        }
    };
    info!(
        "generating level: {} rooms, {} edges",
        graph.len(),
        graph.edges().len()
    );

    let solver = LayoutSolver::new(catalog, config.layout);
    let layout = solver.place(&graph, LayoutBounds::from_graph(&graph), rng)?;
    let grid = Grid::build(&layout, &layout.rooms);
    info!(
        "level ready: {}x{} grid, {} walkable cells",
        grid.width,
        grid.height,
        grid.walkable_count()
    );

    Ok(GeneratedLevel {
        graph,
        layout,
        grid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::test_catalog;
    use crate::error::LayoutError;
    use crate::layout::tests::linear_graph;
    use crate::rewrite::RewriteRule;
    use crate::rng::GenRng;

    #[test]
    fn test_generate_without_rules() {
        let graph = linear_graph();
        let level = generate_level(
            &graph,
            &RuleSet::new(),
            &test_catalog(),
            &GenerationConfig::default(),
            &mut GenRng::new(10),
        )
        .unwrap();
        assert_eq!(level.graph, graph);
        assert_eq!(level.layout.rooms.len(), 3);
        assert!(level.grid.walkable_count() > 0);
    }

    #[test]
    fn test_rooms_are_reachable_from_the_entrance() {
        let graph = linear_graph();
        let config = GenerationConfig::default();
        let level = generate_level(&graph, &RuleSet::new(), &test_catalog(), &config, &mut GenRng::new(6))
            .unwrap();
        let entrance = level.graph.entrance().unwrap();
        let start = level.room_center(entrance).unwrap();
        let mut pathfinder = level.pathfinder(&config);
        for room in &level.layout.rooms {
            let goal = room.central_floor().unwrap();
            let path = pathfinder.find_path(&level.grid, start, goal);
            assert!(path.is_some(), "room {} unreachable", room.id);
        }
    }

    #[test]
    fn test_bad_rules_fall_back_to_authored_graph() {
        let graph = linear_graph();
        let mut rhs = RoomGraph::fragment();
        rhs.add_room("Hub");
        let rules = RuleSet::from(vec![RewriteRule::new("broken", "Generic", rhs, RoomId(9))]);
        let level = generate_level(
            &graph,
            &rules,
            &test_catalog(),
            &GenerationConfig::default(),
            &mut GenRng::new(2),
        )
        .unwrap();
        assert_eq!(level.graph, graph);
    }

    #[test]
    fn test_rule_dropping_the_entrance_falls_back() {
        let mut graph = RoomGraph::new(50, 50, 2);
        let e = graph.add_room(crate::room_graph::RoomType::entrance());
        let g = graph.add_room("Generic");
        graph.connect(e, g).unwrap();

        let mut rhs = RoomGraph::fragment();
        let lobby = rhs.add_room("Lobby");
        let hall = rhs.add_room("Hall");
        rhs.connect(lobby, hall).unwrap();
        let rules = RuleSet::from(vec![RewriteRule::new(
            "lobby",
            crate::room_graph::RoomType::entrance(),
            rhs,
            lobby,
        )]);
        let mut config = GenerationConfig::default();
        config.rewrite.probability = 1.0;

        let level = generate_level(&graph, &rules, &test_catalog(), &config, &mut GenRng::new(4))
            .unwrap();
        assert_eq!(level.graph, graph);
        assert_eq!(level.layout.rooms.len(), 2);
    }

    #[test]
    fn test_layout_errors_are_reported() {
        let mut graph = linear_graph();
        graph.width = 6;
        graph.height = 6;
        let mut config = GenerationConfig::default();
        config.layout.generation_attempts = 2;
        let err = generate_level(&graph, &RuleSet::new(), &test_catalog(), &config, &mut GenRng::new(1))
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::Layout(LayoutError::Exhausted { attempts: 2 })
        );
    }
}

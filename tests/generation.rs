//! End-to-end generation scenarios through the public API.

use graph_dungeon::{
    generate_level, GenRng, GenerationConfig, Grid, LayoutBounds, LayoutSolver, LevelFile,
    PlacementStrategy, RewriteRule, RoomCatalog, RoomGraph, RoomTemplate, RoomType, RuleSet,
};

fn square(name: &str, size: usize) -> RoomTemplate {
    let wall = "#".repeat(size);
    let inner = format!("#{}#", ".".repeat(size - 2));
    let mut rows = vec![wall.clone()];
    rows.extend(std::iter::repeat(inner).take(size - 2));
    rows.push(wall);
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    RoomTemplate::parse(name, &rows).unwrap()
}

fn catalog() -> RoomCatalog {
    let mut catalog = RoomCatalog::new();
    catalog.insert("Entrance", square("entrance", 5));
    catalog.insert_fallback(square("small", 5));
    catalog.insert_fallback(square("large", 7));
    catalog
}

fn chain() -> RoomGraph {
    let mut graph = RoomGraph::new(50, 50, 2);
    let e = graph.add_room(RoomType::entrance());
    let a = graph.add_room("A");
    let b = graph.add_room("B");
    graph.connect(e, a).unwrap();
    graph.connect(a, b).unwrap();
    graph
}

fn config(strategy: PlacementStrategy) -> GenerationConfig {
    let mut config = GenerationConfig::default();
    config.layout.strategy = strategy;
    config
}

#[test]
fn test_chain_places_three_rooms_with_both_strategies() {
    let graph = chain();
    let catalog = catalog();
    for strategy in [PlacementStrategy::GraphBudget, PlacementStrategy::Area] {
        let solver = LayoutSolver::new(&catalog, config(strategy).layout);
        let bounds = LayoutBounds::from_graph(&graph);
        let layout = solver.place(&graph, bounds, &mut GenRng::new(42)).unwrap();

        assert_eq!(layout.rooms.len(), 3);
        assert_eq!(layout.corridors.len(), 2);
        for (i, a) in layout.rooms.iter().enumerate() {
            for b in &layout.rooms[i + 1..] {
                assert!(!a.rect().expanded(2).intersects(&b.rect()));
            }
        }
    }
}

#[test]
fn test_every_room_is_reachable_on_the_grid() {
    let mut graph = chain();
    let ids: Vec<_> = graph.nodes().iter().map(|n| n.id).collect();
    // Close a loop back to the entrance
    let c = graph.add_room("C");
    graph.connect(ids[2], c).unwrap();
    graph.connect(c, ids[0]).unwrap();

    for strategy in [PlacementStrategy::GraphBudget, PlacementStrategy::Area] {
        let config = config(strategy);
        let level = generate_level(&graph, &RuleSet::new(), &catalog(), &config, &mut GenRng::new(3))
            .unwrap();
        let start = level.room_center(ids[0]).unwrap();
        let mut pathfinder = level.pathfinder(&config);
        for room in &level.layout.rooms {
            let goal = room.central_floor().unwrap();
            let path = pathfinder
                .find_path(&level.grid, start, goal)
                .unwrap_or_else(|| panic!("{:?}: room {} unreachable", strategy, room.id));
            assert_eq!(path.cells.first(), Some(&start));
            assert_eq!(path.cells.last(), Some(&goal));
            assert!(path.cells.iter().all(|c| level.grid.is_walkable(*c)));
        }
    }
}

#[test]
fn test_rewritten_level_is_placed() {
    let graph = chain();
    let mut rhs = RoomGraph::fragment();
    let hall = rhs.add_room("Hall");
    let closet = rhs.add_room("Closet");
    rhs.connect(hall, closet).unwrap();
    let rules = RuleSet::from(vec![RewriteRule::new("hall", "A", rhs, hall)]);

    let mut config = GenerationConfig::default();
    config.rewrite.probability = 1.0;
    let level = generate_level(&graph, &rules, &catalog(), &config, &mut GenRng::new(8)).unwrap();

    assert_eq!(level.graph.len(), 4);
    assert_eq!(level.layout.rooms.len(), 4);
    assert_eq!(level.layout.corridors.len(), 3);
    assert!(level.graph.nodes().iter().all(|n| n.room_type.as_str() != "A"));
    // The head takes over both of A's links and keeps its own to the closet
    let head = level
        .graph
        .nodes()
        .iter()
        .find(|n| n.room_type.as_str() == "Hall")
        .unwrap();
    assert_eq!(head.degree(), 3);
    let closet = level
        .graph
        .nodes()
        .iter()
        .find(|n| n.room_type.as_str() == "Closet")
        .unwrap();
    assert_eq!(closet.degree(), 1);
    // The authored graph is left alone
    assert_eq!(graph.len(), 3);
}

#[test]
fn test_same_seed_same_level() {
    let level = LevelFile::load(concat!(env!("CARGO_MANIFEST_DIR"), "/levels/demo.json")).unwrap();
    let run = |seed| {
        generate_level(&level.graph, &level.rules, &level.catalog, &level.config, &mut GenRng::new(seed))
            .unwrap()
    };
    let a = run(1234);
    let b = run(1234);
    assert_eq!(a.graph, b.graph);
    assert_eq!(a.grid, b.grid);
    assert_eq!(a.layout.corridors, b.layout.corridors);
}

#[test]
fn test_grid_and_pathfinding_without_generation() {
    let grid = Grid::from_rows(&[
        "..........",
        ".########.",
        ".#......#.",
        ".#.####.#.",
        "...#..#...",
    ]);
    let path = graph_dungeon::find_path(&grid, (0, 0), (4, 4));
    assert!(path.is_none(), "(4, 4) is sealed in");

    let path = graph_dungeon::find_path(&grid, (0, 4), (9, 4)).unwrap();
    assert_eq!(path.cells.first(), Some(&(0, 4)));
    assert_eq!(path.cells.last(), Some(&(9, 4)));
    assert_eq!(
        graph_dungeon::next_step_toward(&grid, (0, 4), (9, 4)),
        Some(path.cells[1])
    );
}

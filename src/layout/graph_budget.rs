//! Growing a layout outward from the entrance.
//!
//! Rooms are visited breadth first. An unplaced neighbor is positioned at
//! the end of a short corridor walked out of a free side; a neighbor that is
//! already placed (a cycle in the graph) is joined by routing around rooms.

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use super::corridor::{outward_walk, route, Link};
use super::{Corridor, Layout, PlacementContext, PlacementFailure};
use crate::catalog::RoomTemplate;
use crate::geometry::{manhattan, Cell, Rect, Side};
use crate::placed_room::PlacedRoom;
use crate::room_graph::{RoomGraph, RoomId};

/// Edge key independent of direction
fn edge_key(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One placement attempt. Any failure abandons the whole attempt.
pub(super) fn place(
    ctx: &PlacementContext<'_>,
    graph: &RoomGraph,
    entrance: RoomId,
    rng: &mut impl Rng,
) -> Result<Layout, PlacementFailure> {
    let mut layout = Layout::new();
    let root = graph
        .node(entrance)
        .ok_or(PlacementFailure::NotPlaced(entrance))?;
    ctx.scatter(&mut layout, root, rng)?;

    let mut connected: HashSet<(RoomId, RoomId)> = HashSet::new();
    let mut queued = HashSet::from([entrance]);
    let mut queue = VecDeque::from([entrance]);

    while let Some(id) = queue.pop_front() {
        let node = graph.node(id).ok_or(PlacementFailure::NotPlaced(id))?;
        let pending: Vec<RoomId> = node
            .neighbors()
            .iter()
            .copied()
            .filter(|n| !connected.contains(&edge_key(id, *n)))
            .collect();

        let available = layout
            .room(id)
            .ok_or(PlacementFailure::NotPlaced(id))?
            .edges
            .available_count();
        if pending.len() > available {
            return Err(PlacementFailure::InsufficientEdges {
                room: id,
                needed: pending.len(),
                available,
            });
        }

        for neighbor in pending {
            if layout.room(neighbor).is_some() {
                connect_placed(ctx, &mut layout, id, neighbor, rng)?;
            } else {
                place_child(ctx, &mut layout, graph, id, neighbor, rng)?;
            }
            connected.insert(edge_key(id, neighbor));
            if queued.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    Ok(layout)
}

/// Where a child room would go, found by walking out of its parent
struct ChildSite {
    side: Side,
    door: Cell,
    cells: Vec<Cell>,
    entry_side: Side,
    entry_door: Cell,
    anchor: Cell,
}

fn place_child(
    ctx: &PlacementContext<'_>,
    layout: &mut Layout,
    graph: &RoomGraph,
    parent: RoomId,
    child: RoomId,
    rng: &mut impl Rng,
) -> Result<(), PlacementFailure> {
    let node = graph.node(child).ok_or(PlacementFailure::NotPlaced(child))?;
    let mut variants: Vec<&RoomTemplate> = match ctx.catalog.variants(&node.room_type) {
        Ok(list) => list.iter().collect(),
        Err(_) => return Err(PlacementFailure::PrefabBudget { room: child }),
    };
    variants.shuffle(rng);

    for template in variants.into_iter().take(ctx.config.prefab_attempts as usize) {
        for _ in 0..ctx.config.position_attempts {
            let Some(site) = find_child_site(ctx, layout, parent, template, rng) else {
                continue;
            };

            if !layout.open_door(parent, site.side, site.door) {
                return Err(PlacementFailure::NotPlaced(parent));
            }
            let mut room = PlacedRoom::new(child, node.room_type.clone(), template.clone(), site.anchor);
            room.add_door(site.entry_side, site.entry_door);
            layout.rooms.push(room);
            layout.add_corridor(Corridor {
                from: parent,
                to: child,
                cells: site.cells,
            });
            return Ok(());
        }
    }

    Err(PlacementFailure::PrefabBudget { room: child })
}

fn find_child_site(
    ctx: &PlacementContext<'_>,
    layout: &Layout,
    parent: RoomId,
    template: &RoomTemplate,
    rng: &mut impl Rng,
) -> Option<ChildSite> {
    let room = layout.room(parent)?;
    let side = room.edges.pick_available(rng)?;
    let door = *room.doorways(side).choose(rng)?;

    let (lo, hi) = (
        ctx.config.walk_min.min(ctx.config.walk_max),
        ctx.config.walk_min.max(ctx.config.walk_max),
    );
    let length = rng.gen_range(lo..=hi).max(1) as usize;
    let (cells, heading) = outward_walk(
        layout,
        ctx.bounds.rect(),
        side.step(door),
        side,
        length,
        ctx.config,
        rng,
    )?;

    // The child's door is one step past the end of the walk, on the side
    // facing back along it
    let end = *cells.last()?;
    let entry_side = heading.opposite();
    let entry_door = heading.step(end);
    let local = *template.doorways(entry_side).choose(rng)?;
    let anchor = (entry_door.0 - local.0, entry_door.1 - local.1);

    let rect = Rect::new(anchor.0, anchor.1, template.width(), template.height());
    if !layout.fits(&rect, &ctx.bounds) || cells.iter().any(|c| rect.contains(c.0, c.1)) {
        return None;
    }

    Some(ChildSite {
        side,
        door,
        cells,
        entry_side,
        entry_door,
        anchor,
    })
}

/// Join two rooms that are both already placed
fn connect_placed(
    ctx: &PlacementContext<'_>,
    layout: &mut Layout,
    a: RoomId,
    b: RoomId,
    rng: &mut impl Rng,
) -> Result<(), PlacementFailure> {
    let link = plan_cycle_link(ctx, layout, a, b, rng)?
        .ok_or(PlacementFailure::CorridorBlocked { from: a, to: b })?;
    link.commit(layout)
}

fn plan_cycle_link(
    ctx: &PlacementContext<'_>,
    layout: &Layout,
    a: RoomId,
    b: RoomId,
    rng: &mut impl Rng,
) -> Result<Option<Link>, PlacementFailure> {
    let room_a = layout.room(a).ok_or(PlacementFailure::NotPlaced(a))?;
    let room_b = layout.room(b).ok_or(PlacementFailure::NotPlaced(b))?;

    let mut sides_a = room_a.edges.available();
    sides_a.shuffle(rng);

    for side_a in sides_a {
        let Some(&door_a) = room_a.doorways(side_a).choose(rng) else {
            continue;
        };
        let start = side_a.step(door_a);

        let mut targets: Vec<(Side, Cell)> = room_b
            .edges
            .available()
            .into_iter()
            .filter_map(|s| room_b.doorways(s).choose(rng).map(|d| (s, *d)))
            .collect();
        targets.sort_by_key(|(s, d)| manhattan(start, s.step(*d)));

        for (side_b, door_b) in targets {
            let goal = side_b.step(door_b);
            if let Some(cells) = route(layout, ctx.bounds.rect(), start, goal) {
                return Ok(Some(Link {
                    from: a,
                    from_side: side_a,
                    from_door: door_a,
                    to: b,
                    to_side: side_b,
                    to_door: door_b,
                    cells,
                }));
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::test_catalog;
    use crate::config::LayoutConfig;
    use crate::layout::tests::{assert_well_formed, linear_graph};
    use crate::layout::{LayoutBounds, LayoutSolver};
    use crate::rng::GenRng;
    use crate::room_graph::RoomType;

    #[test]
    fn test_linear_graph_places_every_room() {
        let catalog = test_catalog();
        let solver = LayoutSolver::new(&catalog, LayoutConfig::default());
        let graph = linear_graph();
        let bounds = LayoutBounds::from_graph(&graph);
        for seed in 0..8 {
            let layout = solver.place(&graph, bounds, &mut GenRng::new(seed)).unwrap();
            assert_well_formed(&layout, &graph, &bounds);
        }
    }

    #[test]
    fn test_cycle_is_closed_with_a_routed_corridor() {
        let mut graph = RoomGraph::new(60, 60, 2);
        let e = graph.add_room(RoomType::entrance());
        let a = graph.add_room("Generic");
        let b = graph.add_room("Generic");
        let c = graph.add_room("Generic");
        graph.connect(e, a).unwrap();
        graph.connect(a, b).unwrap();
        graph.connect(b, c).unwrap();
        graph.connect(c, e).unwrap();

        let catalog = test_catalog();
        let solver = LayoutSolver::new(&catalog, LayoutConfig::default());
        let bounds = LayoutBounds::from_graph(&graph);
        let layout = solver.place(&graph, bounds, &mut GenRng::new(21)).unwrap();
        assert_well_formed(&layout, &graph, &bounds);
    }

    #[test]
    fn test_side_budget_limits_degree() {
        let mut graph = RoomGraph::new(80, 80, 2);
        let e = graph.add_room(RoomType::entrance());
        for _ in 0..5 {
            let n = graph.add_room("Generic");
            graph.connect(e, n).unwrap();
        }

        let catalog = test_catalog();
        let config = LayoutConfig::default();
        let ctx = PlacementContext {
            catalog: &catalog,
            config: &config,
            bounds: LayoutBounds::from_graph(&graph),
        };
        let err = place(&ctx, &graph, e, &mut GenRng::new(3)).unwrap_err();
        assert_eq!(
            err,
            PlacementFailure::InsufficientEdges {
                room: e,
                needed: 5,
                available: 4
            }
        );
    }

    #[test]
    fn test_same_seed_same_layout() {
        let catalog = test_catalog();
        let solver = LayoutSolver::new(&catalog, LayoutConfig::default());
        let graph = linear_graph();
        let bounds = LayoutBounds::from_graph(&graph);
        let first = solver.place(&graph, bounds, &mut GenRng::new(77)).unwrap();
        let second = solver.place(&graph, bounds, &mut GenRng::new(77)).unwrap();
        let anchors = |l: &Layout| l.rooms.iter().map(|r| (r.id, r.anchor())).collect::<Vec<_>>();
        assert_eq!(anchors(&first), anchors(&second));
        assert_eq!(first.corridors, second.corridors);
    }

    #[test]
    fn test_children_sit_at_the_end_of_their_corridor() {
        let catalog = test_catalog();
        let solver = LayoutSolver::new(&catalog, LayoutConfig::default());
        let graph = linear_graph();
        let layout = solver
            .place(&graph, LayoutBounds::from_graph(&graph), &mut GenRng::new(12))
            .unwrap();
        let config = LayoutConfig::default();
        for corridor in &layout.corridors {
            assert!(corridor.cells.len() >= config.walk_min as usize);
            assert!(corridor.cells.len() <= config.walk_max as usize);
        }
    }
}

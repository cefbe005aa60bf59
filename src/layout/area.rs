//! Scatter-then-connect placement.
//!
//! Every room is dropped somewhere legal first, then each graph edge is joined
//! through the closest pair of free sides. A biased walk is tried before
//! falling back to a shortest route.

use rand::seq::SliceRandom;
use rand::Rng;

use super::corridor::{connecting_walk, route, Link};
use super::{Layout, PlacementContext, PlacementFailure};
use crate::geometry::Side;
use crate::room_graph::{RoomGraph, RoomId};

pub(super) fn place(
    ctx: &PlacementContext<'_>,
    graph: &RoomGraph,
    rng: &mut impl Rng,
) -> Result<Layout, PlacementFailure> {
    let mut layout = Layout::new();
    for node in graph.nodes() {
        ctx.scatter(&mut layout, node, rng)?;
    }
    for (a, b) in graph.edges() {
        let link = plan_link(ctx, &layout, a, b, rng)?;
        link.commit(&mut layout)?;
    }
    Ok(layout)
}

/// Free side pairs of two rooms, closest midpoints first
fn side_pairs(layout: &Layout, a: RoomId, b: RoomId) -> Result<Vec<(Side, Side)>, PlacementFailure> {
    let room_a = layout.room(a).ok_or(PlacementFailure::NotPlaced(a))?;
    let room_b = layout.room(b).ok_or(PlacementFailure::NotPlaced(b))?;

    for room in [room_a, room_b] {
        if room.edges.available_count() == 0 {
            return Err(PlacementFailure::InsufficientEdges {
                room: room.id,
                needed: 1,
                available: 0,
            });
        }
    }

    let mut pairs: Vec<(f32, Side, Side)> = Vec::new();
    for sa in room_a.edges.available() {
        for sb in room_b.edges.available() {
            let (ax, ay) = room_a.side_midpoint(sa);
            let (bx, by) = room_b.side_midpoint(sb);
            let dist = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
            pairs.push((dist, sa, sb));
        }
    }
    pairs.sort_by(|x, y| x.0.total_cmp(&y.0));
    Ok(pairs.into_iter().map(|(_, sa, sb)| (sa, sb)).collect())
}

fn plan_link(
    ctx: &PlacementContext<'_>,
    layout: &Layout,
    a: RoomId,
    b: RoomId,
    rng: &mut impl Rng,
) -> Result<Link, PlacementFailure> {
    let room_a = layout.room(a).ok_or(PlacementFailure::NotPlaced(a))?;
    let room_b = layout.room(b).ok_or(PlacementFailure::NotPlaced(b))?;
    let area = ctx.bounds.rect();

    for (side_a, side_b) in side_pairs(layout, a, b)? {
        let (Some(&door_a), Some(&door_b)) = (
            room_a.doorways(side_a).choose(rng),
            room_b.doorways(side_b).choose(rng),
        ) else {
            continue;
        };
        let start = side_a.step(door_a);
        let goal = side_b.step(door_b);

        let cells = connecting_walk(layout, area, start, goal, ctx.config, rng)
            .or_else(|| route(layout, area, start, goal));
        if let Some(cells) = cells {
            return Ok(Link {
                from: a,
                from_side: side_a,
                from_door: door_a,
                to: b,
                to_side: side_b,
                to_door: door_b,
                cells,
            });
        }
    }

    Err(PlacementFailure::CorridorBlocked { from: a, to: b })
}

//! Corridor carving: random walks and a guaranteed-clear fallback route.
//!
//! All three carve only in-bounds cells outside every room footprint.
//! Existing corridors may be crossed.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Corridor, Layout, PlacementFailure};
use crate::config::LayoutConfig;
use crate::geometry::{manhattan, Cell, Rect, Side};
use crate::grid::Grid;
use crate::pathfinding::{Pathfinder, SearchOptions};
use crate::room_graph::RoomId;

/// A planned corridor between two placed rooms, not yet committed
pub(super) struct Link {
    pub from: RoomId,
    pub from_side: Side,
    pub from_door: Cell,
    pub to: RoomId,
    pub to_side: Side,
    pub to_door: Cell,
    pub cells: Vec<Cell>,
}

impl Link {
    /// Open both doors and record the corridor
    pub(super) fn commit(self, layout: &mut Layout) -> Result<(), PlacementFailure> {
        if !layout.open_door(self.from, self.from_side, self.from_door) {
            return Err(PlacementFailure::NotPlaced(self.from));
        }
        if !layout.open_door(self.to, self.to_side, self.to_door) {
            return Err(PlacementFailure::NotPlaced(self.to));
        }
        layout.add_corridor(Corridor {
            from: self.from,
            to: self.to,
            cells: self.cells,
        });
        Ok(())
    }
}

/// Cells a corridor may not enter
struct Obstacles<'a> {
    layout: &'a Layout,
    area: Rect,
}

impl Obstacles<'_> {
    #[inline]
    fn blocked(&self, cell: Cell) -> bool {
        !self.area.contains(cell.0, cell.1) || self.layout.is_room_cell(cell)
    }
}

/// Walk away from a door for `length` cells, starting at `seed`.
///
/// Steps are cardinal and never reverse or revisit. Returns the cells and
/// the heading of the final step, or None if the walk boxed itself in or
/// used up its iteration budget.
pub(super) fn outward_walk(
    layout: &Layout,
    area: Rect,
    seed: Cell,
    heading: Side,
    length: usize,
    config: &LayoutConfig,
    rng: &mut impl Rng,
) -> Option<(Vec<Cell>, Side)> {
    let obstacles = Obstacles { layout, area };
    if obstacles.blocked(seed) {
        return None;
    }

    let mut cells = vec![seed];
    let mut heading = heading;
    let mut iterations = 0;

    while cells.len() < length {
        iterations += 1;
        if iterations > config.walk_iteration_cap {
            return None;
        }

        let dir = if rng.gen_bool(config.walk_straightness) {
            heading
        } else {
            let turns: Vec<Side> = Side::ALL
                .into_iter()
                .filter(|s| *s != heading.opposite())
                .collect();
            *turns.choose(rng)?
        };

        let current = *cells.last()?;
        let next = dir.step(current);
        if obstacles.blocked(next) || cells.contains(&next) {
            continue;
        }
        cells.push(next);
        heading = dir;
    }

    Some((cells, heading))
}

/// Biased random walk from `from` until it reaches `to`.
///
/// Loops are erased as they form, so the result is a simple path. Returns
/// None if the walk runs out of iterations.
pub(super) fn connecting_walk(
    layout: &Layout,
    area: Rect,
    from: Cell,
    to: Cell,
    config: &LayoutConfig,
    rng: &mut impl Rng,
) -> Option<Vec<Cell>> {
    let obstacles = Obstacles { layout, area };
    if obstacles.blocked(from) || obstacles.blocked(to) {
        return None;
    }

    let cap = config.walk_iteration_cap.max(manhattan(from, to) * 4);
    let mut cells = vec![from];
    let mut index: HashMap<Cell, usize> = HashMap::from([(from, 0)]);
    let mut iterations = 0;

    while let Some(&current) = cells.last() {
        if current == to {
            return Some(cells);
        }
        iterations += 1;
        if iterations > cap {
            return None;
        }

        let dir = if rng.gen_bool(config.walk_bias) {
            toward(current, to, rng)
        } else {
            *Side::ALL.choose(rng)?
        };
        let next = dir.step(current);
        if obstacles.blocked(next) {
            continue;
        }

        if let Some(&i) = index.get(&next) {
            // Erase the loop we just closed
            for cell in cells.drain(i + 1..) {
                index.remove(&cell);
            }
        } else {
            index.insert(next, cells.len());
            cells.push(next);
        }
    }

    None
}

/// Direction that reduces the distance to `to`, picking an axis at random
fn toward(from: Cell, to: Cell, rng: &mut impl Rng) -> Side {
    let horizontal = match to.0.cmp(&from.0) {
        std::cmp::Ordering::Less => Some(Side::Left),
        std::cmp::Ordering::Greater => Some(Side::Right),
        std::cmp::Ordering::Equal => None,
    };
    let vertical = match to.1.cmp(&from.1) {
        std::cmp::Ordering::Less => Some(Side::Top),
        std::cmp::Ordering::Greater => Some(Side::Bottom),
        std::cmp::Ordering::Equal => None,
    };
    match (horizontal, vertical) {
        (Some(h), Some(v)) => {
            if rng.gen_bool(0.5) {
                h
            } else {
                v
            }
        }
        (Some(h), None) => h,
        (None, Some(v)) => v,
        // Already there; any direction will do
        (None, None) => Side::Right,
    }
}

/// Shortest cardinal route from `from` to `to` that avoids every room.
///
/// Used where a random walk cannot be trusted to arrive, such as joining two
/// rooms that are both already placed.
pub(super) fn route(layout: &Layout, area: Rect, from: Cell, to: Cell) -> Option<Vec<Cell>> {
    let obstacles = Obstacles { layout, area };
    let grid = Grid::from_fn(area, |cell| !obstacles.blocked(cell));
    Pathfinder::new(SearchOptions::cardinal())
        .find_path(&grid, from, to)
        .map(|path| path.cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::square_room;
    use crate::placed_room::PlacedRoom;
    use crate::rng::GenRng;
    use crate::room_graph::RoomType;

    fn layout_with_wall() -> Layout {
        // A tall room splits the area into a left and a right half,
        // leaving a gap along the top and bottom rows
        let mut layout = Layout::new();
        let template = crate::catalog::RoomTemplate::parse(
            "pillar",
            &["###", "#.#", "#.#", "#.#", "#.#", "#.#", "###"],
        )
        .unwrap();
        layout
            .rooms
            .push(PlacedRoom::new(RoomId(0), RoomType::new("Pillar"), template, (5, 1)));
        layout
    }

    fn is_cardinal_chain(cells: &[Cell]) -> bool {
        cells
            .windows(2)
            .all(|w| (w[1].0 - w[0].0).abs() + (w[1].1 - w[0].1).abs() == 1)
    }

    #[test]
    fn test_outward_walk_has_requested_length() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 40, 40);
        let config = LayoutConfig::default();
        let mut rng = GenRng::new(11);
        let (cells, heading) =
            outward_walk(&layout, area, (20, 20), Side::Right, 6, &config, &mut rng).unwrap();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], (20, 20));
        assert!(is_cardinal_chain(&cells));
        let n = cells.len();
        assert_eq!(heading.step(cells[n - 2]), cells[n - 1]);
    }

    #[test]
    fn test_outward_walk_from_blocked_seed_fails() {
        let mut layout = Layout::new();
        layout
            .rooms
            .push(PlacedRoom::new(RoomId(0), RoomType::entrance(), square_room("e", 5), (0, 0)));
        let config = LayoutConfig::default();
        let mut rng = GenRng::new(2);
        let area = Rect::new(0, 0, 20, 20);
        assert!(outward_walk(&layout, area, (2, 2), Side::Right, 4, &config, &mut rng).is_none());
    }

    #[test]
    fn test_connecting_walk_reaches_target_around_rooms() {
        let layout = layout_with_wall();
        let area = Rect::new(0, 0, 12, 9);
        let config = LayoutConfig::default();
        let mut rng = GenRng::new(4);
        if let Some(cells) = connecting_walk(&layout, area, (1, 4), (10, 4), &config, &mut rng) {
            assert_eq!(cells.first(), Some(&(1, 4)));
            assert_eq!(cells.last(), Some(&(10, 4)));
            assert!(is_cardinal_chain(&cells));
            assert!(cells.iter().all(|c| !layout.is_room_cell(*c)));
            let unique: std::collections::HashSet<_> = cells.iter().collect();
            assert_eq!(unique.len(), cells.len(), "loops must be erased");
        }
    }

    #[test]
    fn test_route_goes_around_rooms() {
        let layout = layout_with_wall();
        let area = Rect::new(0, 0, 12, 9);
        let cells = route(&layout, area, (1, 4), (10, 4)).unwrap();
        assert_eq!(cells.first(), Some(&(1, 4)));
        assert_eq!(cells.last(), Some(&(10, 4)));
        assert!(is_cardinal_chain(&cells));
        assert!(cells.iter().all(|c| !layout.is_room_cell(*c)));
        // Straight across is 9 steps; detouring over the pillar costs more
        assert!(cells.len() > 10);
    }

    #[test]
    fn test_route_fails_when_sealed() {
        let layout = layout_with_wall();
        // Without the top and bottom rows there is no way past the pillar
        let area = Rect::new(0, 1, 12, 7);
        assert!(route(&layout, area, (1, 4), (10, 4)).is_none());
    }
}

//! Room templates and the catalog that maps room types to them.
//!
//! A template is a small character map:
//!
//! ```text
//! #######
//! #.....#
//! #..o..#
//! #.....#
//! #######
//! ```
//!
//! `#` is wall, `.` is floor, `o` is a blocking prop standing on floor and a
//! space is void (outside the room). Corridors enter through doorway cells:
//! non-corner border walls whose inward neighbor is floor.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::TEMPLATE_MIN_SIZE;
use crate::error::{LayoutError, TemplateError};
use crate::geometry::{Cell, Side};
use crate::room_graph::RoomType;

/// What a template says about one of its cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateCell {
    Void,
    Floor,
    Wall,
    /// Floor covered by something an agent cannot walk through
    Prop,
}

impl TemplateCell {
    fn parse(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(TemplateCell::Void),
            '.' => Some(TemplateCell::Floor),
            '#' => Some(TemplateCell::Wall),
            'o' => Some(TemplateCell::Prop),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TemplateSpec {
    name: String,
    layout: Vec<String>,
}

/// A prefab footprint a room can be stamped with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateSpec", into = "TemplateSpec")]
pub struct RoomTemplate {
    name: String,
    width: usize,
    height: usize,
    cells: Vec<TemplateCell>,
    /// Doorway candidates per side, in `Side::ALL` order, as local cells
    doorways: [Vec<Cell>; 4],
}

impl RoomTemplate {
    /// Parse a template from its character rows.
    pub fn parse(name: impl Into<String>, rows: &[&str]) -> Result<Self, TemplateError> {
        let name = name.into();
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(TemplateError::NotRectangular { name });
        }
        if width < TEMPLATE_MIN_SIZE || height < TEMPLATE_MIN_SIZE {
            return Err(TemplateError::TooSmall {
                name,
                width,
                height,
                min: TEMPLATE_MIN_SIZE,
            });
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            for ch in row.chars() {
                let cell = TemplateCell::parse(ch)
                    .ok_or_else(|| TemplateError::UnknownCell { name: name.clone(), ch })?;
                cells.push(cell);
            }
        }

        let mut template = Self {
            name,
            width,
            height,
            cells,
            doorways: Default::default(),
        };
        for side in Side::ALL {
            let doorways = template.find_doorways(side);
            if doorways.is_empty() {
                return Err(TemplateError::NoDoorway {
                    name: template.name,
                    side,
                });
            }
            template.doorways[side.index()] = doorways;
        }
        Ok(template)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> i32 {
        self.width as i32
    }

    pub fn height(&self) -> i32 {
        self.height as i32
    }

    /// Cell kind at a local position; anything outside the template is void.
    pub fn cell(&self, x: i32, y: i32) -> TemplateCell {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return TemplateCell::Void;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// Local doorway cells on one side
    pub fn doorways(&self, side: Side) -> &[Cell] {
        &self.doorways[side.index()]
    }

    /// Floor cell nearest the template center, used as a room's landmark
    pub fn central_floor(&self) -> Option<Cell> {
        let cx = self.width as i32 / 2;
        let cy = self.height as i32 / 2;
        (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| self.cell(x, y) == TemplateCell::Floor)
            .min_by_key(|&(x, y)| (x - cx).abs() + (y - cy).abs())
    }

    fn find_doorways(&self, side: Side) -> Vec<Cell> {
        let (w, h) = (self.width as i32, self.height as i32);
        let border: Vec<Cell> = match side {
            Side::Left => (1..h - 1).map(|y| (0, y)).collect(),
            Side::Right => (1..h - 1).map(|y| (w - 1, y)).collect(),
            Side::Top => (1..w - 1).map(|x| (x, 0)).collect(),
            Side::Bottom => (1..w - 1).map(|x| (x, h - 1)).collect(),
        };
        let inward = side.opposite();
        border
            .into_iter()
            .filter(|&(x, y)| {
                let (ix, iy) = inward.step((x, y));
                self.cell(x, y) == TemplateCell::Wall && self.cell(ix, iy) == TemplateCell::Floor
            })
            .collect()
    }
}

impl TryFrom<TemplateSpec> for RoomTemplate {
    type Error = TemplateError;

    fn try_from(spec: TemplateSpec) -> Result<Self, Self::Error> {
        let rows: Vec<&str> = spec.layout.iter().map(String::as_str).collect();
        RoomTemplate::parse(spec.name, &rows)
    }
}

impl From<RoomTemplate> for TemplateSpec {
    fn from(template: RoomTemplate) -> Self {
        let layout = template
            .cells
            .chunks(template.width)
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        TemplateCell::Void => ' ',
                        TemplateCell::Floor => '.',
                        TemplateCell::Wall => '#',
                        TemplateCell::Prop => 'o',
                    })
                    .collect()
            })
            .collect();
        TemplateSpec {
            name: template.name,
            layout,
        }
    }
}

/// Templates available for each room type
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoomCatalog {
    #[serde(default)]
    rooms: HashMap<RoomType, Vec<RoomTemplate>>,
    /// Used for any type without its own entry
    #[serde(default)]
    fallback: Vec<RoomTemplate>,
}

impl RoomCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, room_type: impl Into<RoomType>, template: RoomTemplate) {
        self.rooms.entry(room_type.into()).or_default().push(template);
    }

    pub fn insert_fallback(&mut self, template: RoomTemplate) {
        self.fallback.push(template);
    }

    /// Every template a room of this type may use
    pub fn variants(&self, room_type: &RoomType) -> Result<&[RoomTemplate], LayoutError> {
        let variants = match self.rooms.get(room_type) {
            Some(list) if !list.is_empty() => list.as_slice(),
            _ => self.fallback.as_slice(),
        };
        if variants.is_empty() {
            return Err(LayoutError::MissingTemplate(room_type.clone()));
        }
        Ok(variants)
    }

    /// Pick one template for a room type at random
    pub fn select(&self, room_type: &RoomType, rng: &mut impl Rng) -> Result<&RoomTemplate, LayoutError> {
        let variants = self.variants(room_type)?;
        variants
            .choose(rng)
            .ok_or_else(|| LayoutError::MissingTemplate(room_type.clone()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::rng::GenRng;

    pub(crate) fn square_room(name: &str, size: usize) -> RoomTemplate {
        let wall = "#".repeat(size);
        let inner = format!("#{}#", ".".repeat(size - 2));
        let mut rows = vec![wall.clone()];
        rows.extend(std::iter::repeat(inner).take(size - 2));
        rows.push(wall);
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        RoomTemplate::parse(name, &rows).unwrap()
    }

    /// Catalog with a couple of small square rooms for every type
    pub(crate) fn test_catalog() -> RoomCatalog {
        let mut catalog = RoomCatalog::new();
        catalog.insert("Entrance", square_room("entrance", 5));
        catalog.insert_fallback(square_room("small", 5));
        catalog.insert_fallback(square_room("medium", 7));
        catalog
    }

    #[test]
    fn test_parse_finds_doorways() {
        let template = RoomTemplate::parse(
            "hall",
            &["#####", "#...#", "#.o.#", "#...#", "#####"],
        )
        .unwrap();
        assert_eq!((template.width(), template.height()), (5, 5));
        assert_eq!(template.cell(2, 2), TemplateCell::Prop);
        assert_eq!(template.doorways(Side::Left), &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(template.doorways(Side::Top), &[(1, 0), (2, 0), (3, 0)]);
        assert_eq!(template.central_floor(), Some((2, 1)));
    }

    #[test]
    fn test_parse_rejects_bad_layouts() {
        assert!(matches!(
            RoomTemplate::parse("ragged", &["####", "#..#", "###"]),
            Err(TemplateError::NotRectangular { .. })
        ));
        assert!(matches!(
            RoomTemplate::parse("tiny", &["##", "##"]),
            Err(TemplateError::TooSmall { .. })
        ));
        assert!(matches!(
            RoomTemplate::parse("odd", &["###", "#x#", "###"]),
            Err(TemplateError::UnknownCell { ch: 'x', .. })
        ));
        assert!(matches!(
            RoomTemplate::parse("sealed", &["####", "#..#", "####", "####"]),
            Err(TemplateError::NoDoorway { side: Side::Bottom, .. })
        ));
    }

    #[test]
    fn test_catalog_falls_back() {
        let catalog = test_catalog();
        let entrance = catalog.variants(&RoomType::entrance()).unwrap();
        assert_eq!(entrance.len(), 1);
        let generic = catalog.variants(&RoomType::new("Generic")).unwrap();
        assert_eq!(generic.len(), 2);

        let mut rng = GenRng::new(3);
        let picked = catalog.select(&RoomType::new("Boss"), &mut rng).unwrap();
        assert!(picked.name() == "small" || picked.name() == "medium");
    }

    #[test]
    fn test_catalog_without_fallback_reports_missing() {
        let mut catalog = RoomCatalog::new();
        catalog.insert("Entrance", square_room("entrance", 5));
        assert_eq!(
            catalog.variants(&RoomType::new("Boss")),
            Err(LayoutError::MissingTemplate(RoomType::new("Boss")))
        );
    }

    #[test]
    fn test_template_loads_from_json() {
        let json = r####"{"name": "cell", "layout": ["###", "#.#", "###"]}"####;
        let template: RoomTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.doorways(Side::Bottom), &[(1, 2)]);
    }
}

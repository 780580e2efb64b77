//! Grid slot placement for GRID and USER_DEFINED layouts.
//!
//! A grid config maps named field slots to rectangles on the 12-unit row
//! grid. Validation is fail-fast: horizontal overflow, duplicate slots, and
//! overlapping rectangles are rejected when the slot is placed, never at
//! serialization time.

use serde_json::{Map, Value, json};

use crate::error::{DisplayError, Result};

/// Rectangle occupied by one named slot, in 12-unit grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridArea {
    pub x: u8,
    pub y: u8,
    pub w: u8,
    pub h: u8,
}

impl GridArea {
    pub fn new(x: u8, y: u8, w: u8, h: u8) -> Self {
        Self { x, y, w, h }
    }

    /// Single-unit cell at the given coordinates.
    pub fn cell(x: u8, y: u8) -> Self {
        Self::new(x, y, 1, 1)
    }

    fn intersects(&self, other: &GridArea) -> bool {
        // Widened so coordinates near u8::MAX cannot wrap.
        u16::from(self.x) < u16::from(other.x) + u16::from(other.w)
            && u16::from(other.x) < u16::from(self.x) + u16::from(self.w)
            && u16::from(self.y) < u16::from(other.y) + u16::from(other.h)
            && u16::from(other.y) < u16::from(self.y) + u16::from(self.h)
    }
}

/// Named slot placement for a grid-style layout. Insertion order is
/// preserved; it determines the column index used when items are addressed.
#[derive(Debug, Clone, Default)]
pub struct GridConfig {
    slots: Vec<(String, GridArea)>,
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a named slot. Fails on horizontal overflow (`x + w > 12`),
    /// duplicate names, and overlap with an already-placed slot.
    pub fn place(&mut self, slot: impl Into<String>, area: GridArea) -> Result<&mut Self> {
        let slot = slot.into();
        if area.w == 0 || area.h == 0 || u16::from(area.x) + u16::from(area.w) > 12 {
            return Err(DisplayError::InvalidGridArea {
                slot,
                x: area.x,
                w: area.w,
            });
        }
        for (existing, existing_area) in &self.slots {
            if *existing == slot {
                return Err(DisplayError::DuplicateGridSlot(slot));
            }
            if area.intersects(existing_area) {
                return Err(DisplayError::GridOverlap {
                    slot,
                    other: existing.clone(),
                });
            }
        }
        self.slots.push((slot, area));
        Ok(self)
    }

    pub fn slots(&self) -> &[(String, GridArea)] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn serialize(&self) -> Value {
        let mut map = Map::new();
        for (slot, area) in &self.slots {
            map.insert(
                slot.clone(),
                json!({ "x": area.x, "y": area.y, "w": area.w, "h": area.h }),
            );
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_accepts_full_width_slot() {
        let mut grid = GridConfig::new();
        grid.place("main", GridArea::new(0, 0, 12, 2)).unwrap();
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn place_rejects_horizontal_overflow() {
        let mut grid = GridConfig::new();
        let err = grid.place("wide", GridArea::new(8, 0, 6, 1)).unwrap_err();
        assert!(matches!(err, DisplayError::InvalidGridArea { .. }));
    }

    #[test]
    fn place_rejects_area_past_u8_range() {
        let mut grid = GridConfig::new();
        let err = grid
            .place("huge", GridArea::new(200, 0, 100, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            DisplayError::InvalidGridArea { x: 200, w: 100, .. }
        ));
    }

    #[test]
    fn place_rejects_duplicate_slot_names() {
        let mut grid = GridConfig::new();
        grid.place("a", GridArea::cell(0, 0)).unwrap();
        let err = grid.place("a", GridArea::cell(1, 0)).unwrap_err();
        assert!(matches!(err, DisplayError::DuplicateGridSlot(_)));
    }

    #[test]
    fn place_rejects_overlapping_rectangles() {
        let mut grid = GridConfig::new();
        grid.place("a", GridArea::new(0, 0, 6, 2)).unwrap();
        let err = grid.place("b", GridArea::new(4, 1, 4, 1)).unwrap_err();
        assert!(matches!(err, DisplayError::GridOverlap { .. }));
    }

    #[test]
    fn adjacent_slots_do_not_overlap() {
        let mut grid = GridConfig::new();
        grid.place("left", GridArea::new(0, 0, 6, 1)).unwrap();
        grid.place("right", GridArea::new(6, 0, 6, 1)).unwrap();
        assert_eq!(grid.len(), 2);
    }
}

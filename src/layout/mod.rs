//! Projection between desktop length units and terminal cells, plus the
//! small region map the panels use for hit-testing.

use ratatui::prelude::Rect;
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_UNITS_PER_COLUMN, DEFAULT_UNITS_PER_ROW};
use crate::window::{FloatRect, Point, Size};

/// How many desktop length units one terminal cell covers on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScale {
    units_per_column: i32,
    units_per_row: i32,
}

impl Default for CellScale {
    fn default() -> Self {
        Self::new(DEFAULT_UNITS_PER_COLUMN, DEFAULT_UNITS_PER_ROW)
    }
}

impl CellScale {
    /// Non-positive factors are raised to 1.
    pub fn new(units_per_column: i32, units_per_row: i32) -> Self {
        Self {
            units_per_column: units_per_column.max(1),
            units_per_row: units_per_row.max(1),
        }
    }

    pub fn units_per_column(&self) -> i32 {
        self.units_per_column
    }

    pub fn units_per_row(&self) -> i32 {
        self.units_per_row
    }

    /// Desktop position of the top-left corner of a cell. `origin` is the
    /// cell where desktop position (0, 0) is drawn.
    pub fn to_units(&self, column: u16, row: u16, origin: (u16, u16)) -> Point {
        Point::new(
            (column as i32 - origin.0 as i32) * self.units_per_column,
            (row as i32 - origin.1 as i32) * self.units_per_row,
        )
    }

    /// Cell rectangle covering a window. The origin rounds toward negative
    /// infinity so windows dragged past the left or top edge keep moving
    /// smoothly instead of sticking at zero.
    pub fn to_cells(&self, position: Point, size: Size, origin: (u16, u16)) -> FloatRect {
        let width = (size.width / self.units_per_column).clamp(1, u16::MAX as i32);
        let height = (size.height / self.units_per_row).clamp(1, u16::MAX as i32);
        FloatRect {
            x: origin.0 as i32 + position.x.div_euclid(self.units_per_column),
            y: origin.1 as i32 + position.y.div_euclid(self.units_per_row),
            width: width as u16,
            height: height as u16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionMap<T: Copy + Eq + Ord> {
    regions: BTreeMap<T, Rect>,
}

impl<T: Copy + Eq + Ord> Default for RegionMap<T> {
    fn default() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }
}

impl<T: Copy + Eq + Ord> RegionMap<T> {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn set(&mut self, id: T, rect: Rect) {
        self.regions.insert(id, rect);
    }

    pub fn get(&self, id: T) -> Option<Rect> {
        self.regions.get(&id).copied()
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<T> {
        self.regions
            .iter()
            .find(|(_, rect)| rect_contains(**rect, column, row))
            .map(|(id, _)| *id)
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

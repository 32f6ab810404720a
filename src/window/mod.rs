pub mod decorator;
pub mod instance;
pub mod pointer;

mod window_manager;

use std::fmt;
use std::ops::{Add, Sub};

use ratatui::prelude::Rect;

pub use instance::{InstanceEvent, WindowInstance};
pub use pointer::{
    Interaction, InteractionMode, PointerCapture, PointerCursor, PointerSurface, PointerTracker,
    PointerUpdate,
};
pub use window_manager::{WindowManager, WindowRecord};

/// Opaque window identifier handed out by the [`WindowManager`].
///
/// Ids are allocated from a session-wide counter and never reused, so a
/// stale id held by an in-flight interaction can never alias a newer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "win-{}", self.0)
    }
}

/// A position in desktop length units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// A width/height pair in desktop length units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Clamp both axes so neither falls below `min`.
    pub fn at_least(self, min: Size) -> Size {
        Size::new(self.width.max(min.width), self.height.max(min.height))
    }
}

/// Geometry a window starts with. The manager picks it once at creation
/// time and hands it to the window instance, which owns the live geometry
/// from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSeed {
    pub position: Point,
    pub size: Size,
}

/// Signed floating rectangle origin with unsigned size, in terminal cells.
///
/// Windows may be dragged partially off the desktop, so the origin can be
/// negative; drawing code clips against the visible bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        let column = column as i32;
        let row = row as i32;
        column >= self.x
            && row >= self.y
            && column < self.x + self.width as i32
            && row < self.y + self.height as i32
    }

    /// The part of this rectangle that lies inside `bounds`.
    pub fn visible(&self, bounds: Rect) -> Rect {
        let left = self.x.max(bounds.x as i32);
        let top = self.y.max(bounds.y as i32);
        let right = (self.x + self.width as i32).min(bounds.x as i32 + bounds.width as i32);
        let bottom = (self.y + self.height as i32).min(bounds.y as i32 + bounds.height as i32);
        if right <= left || bottom <= top {
            return Rect::default();
        }
        Rect {
            x: left as u16,
            y: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        }
    }

    /// Shrink by one cell on every side.
    pub fn inner(&self) -> FloatRect {
        FloatRect {
            x: self.x + 1,
            y: self.y + 1,
            width: self.width.saturating_sub(2),
            height: self.height.saturating_sub(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic_is_exact() {
        let pointer = Point::new(100, 100);
        let position = Point::new(50, 50);
        assert_eq!(pointer - position, Point::new(50, 50));
        assert_eq!(Point::new(70, 80) + Point::new(50, 50), Point::new(120, 130));
    }

    #[test]
    fn float_rect_visible_clips_negative_offsets() {
        let bounds = Rect {
            x: 0,
            y: 1,
            width: 10,
            height: 5,
        };
        let rect = FloatRect {
            x: -4,
            y: 0,
            width: 6,
            height: 3,
        };
        assert_eq!(
            rect.visible(bounds),
            Rect {
                x: 0,
                y: 1,
                width: 2,
                height: 2
            }
        );
    }

    #[test]
    fn float_rect_fully_outside_is_empty() {
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        };
        let rect = FloatRect {
            x: 12,
            y: 0,
            width: 4,
            height: 4,
        };
        assert_eq!(rect.visible(bounds), Rect::default());
        assert!(!rect.contains(5, 1));
    }

    #[test]
    fn size_at_least_clamps_each_axis() {
        let min = Size::new(400, 300);
        assert_eq!(Size::new(550, 200).at_least(min), Size::new(550, 300));
    }
}

//! Shared crate-wide constants.
//!
//! Geometry constants are expressed in desktop length units, not terminal
//! cells. The desktop projects units onto cells through
//! [`crate::layout::CellScale`].

/// Smallest width a window may be resized to.
pub const MIN_WINDOW_WIDTH: i32 = 400;

/// Smallest height a window may be resized to.
pub const MIN_WINDOW_HEIGHT: i32 = 300;

/// Size used for applications without an entry in the size table.
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;

/// Top-left of the first window opened on an empty desktop.
pub const CASCADE_ORIGIN_X: i32 = 300;
pub const CASCADE_ORIGIN_Y: i32 = 100;

/// Diagonal offset between successive new windows, applied once per
/// window already on the desktop.
pub const CASCADE_STEP: i32 = 40;

/// Length units covered by one terminal column.
pub const DEFAULT_UNITS_PER_COLUMN: i32 = 10;

/// Length units covered by one terminal row.
///
/// Terminal cells are roughly twice as tall as they are wide, so the
/// vertical scale is coarser than the horizontal one.
pub const DEFAULT_UNITS_PER_ROW: i32 = 25;

/// Number of frame ticks a closing window stays on screen before the
/// manager is told to drop it.
pub const CLOSE_TRANSITION_TICKS: u8 = 6;

/// Version label rendered in the taskbar.
pub const SYSTEM_VERSION: &str = "7.77";

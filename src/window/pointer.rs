//! Pointer-driven drag and resize.
//!
//! A [`PointerTracker`] turns press/move/release into geometry updates for a
//! single window. Every update is recomputed from the state recorded when
//! the interaction began, so only the latest pointer position matters and
//! coalesced or dropped move events never accumulate error.
//!
//! While an interaction is in progress the desktop holds a
//! [`PointerCapture`]. The capture routes every move and release to the
//! window that started the interaction, regardless of where the pointer is,
//! and changes the shared [`PointerSurface`] hints. Dropping the capture is
//! the only way those hints are reset, so a capture that is released, lost
//! with its window, or unwound through a panic leaves the surface clean.

use std::cell::Cell;
use std::rc::Rc;

use super::{Point, Size, WindowId};
use crate::constants::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

/// Interaction state of one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        /// Pointer position relative to the window origin at press time.
        offset: Point,
    },
    Resizing {
        start_pointer: Point,
        start_size: Size,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Drag,
    Resize,
}

/// Geometry produced by one pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerUpdate {
    Move(Point),
    Resize(Size),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerTracker {
    state: Interaction,
    min_size: Size,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT))
    }
}

impl PointerTracker {
    pub fn new(min_size: Size) -> Self {
        Self {
            state: Interaction::Idle,
            min_size,
        }
    }

    pub fn state(&self) -> Interaction {
        self.state
    }

    pub fn mode(&self) -> Option<InteractionMode> {
        match self.state {
            Interaction::Idle => None,
            Interaction::Dragging { .. } => Some(InteractionMode::Drag),
            Interaction::Resizing { .. } => Some(InteractionMode::Resize),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state != Interaction::Idle
    }

    /// Start dragging. Returns `false` and changes nothing when an
    /// interaction is already running.
    pub fn begin_drag(&mut self, pointer: Point, position: Point) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = Interaction::Dragging {
            offset: pointer - position,
        };
        tracing::trace!(?pointer, ?position, "drag started");
        true
    }

    /// Start resizing from the bottom-right handle. Returns `false` and
    /// changes nothing when an interaction is already running.
    pub fn begin_resize(&mut self, pointer: Point, size: Size) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = Interaction::Resizing {
            start_pointer: pointer,
            start_size: size,
        };
        tracing::trace!(?pointer, ?size, "resize started");
        true
    }

    pub fn update(&self, pointer: Point) -> Option<PointerUpdate> {
        match self.state {
            Interaction::Idle => None,
            Interaction::Dragging { offset } => {
                Some(PointerUpdate::Move(drag_position(pointer, offset)))
            }
            Interaction::Resizing {
                start_pointer,
                start_size,
            } => Some(PointerUpdate::Resize(resize_size(
                start_pointer,
                start_size,
                pointer,
                self.min_size,
            ))),
        }
    }

    /// Return to idle, reporting which mode just ended.
    pub fn end(&mut self) -> Option<InteractionMode> {
        let mode = self.mode();
        self.state = Interaction::Idle;
        if let Some(mode) = mode {
            tracing::trace!(?mode, "interaction ended");
        }
        mode
    }
}

/// Window origin that keeps the grab point under the pointer.
pub fn drag_position(pointer: Point, offset: Point) -> Point {
    pointer - offset
}

/// Size after moving the bottom-right corner, clamped to `min`.
pub fn resize_size(start_pointer: Point, start_size: Size, pointer: Point, min: Size) -> Size {
    let delta = pointer - start_pointer;
    Size::new(
        start_size.width.saturating_add(delta.x),
        start_size.height.saturating_add(delta.y),
    )
    .at_least(min)
}

/// Cursor shape hint for the host terminal or renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerCursor {
    #[default]
    Default,
    Move,
    ResizeDiagonal,
}

impl From<InteractionMode> for PointerCursor {
    fn from(mode: InteractionMode) -> Self {
        match mode {
            InteractionMode::Drag => PointerCursor::Move,
            InteractionMode::Resize => PointerCursor::ResizeDiagonal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct SurfaceState {
    cursor: PointerCursor,
    selection_suppressed: bool,
}

/// Desktop-wide pointer hints shared between the router and renderer.
#[derive(Debug, Clone, Default)]
pub struct PointerSurface {
    state: Rc<Cell<SurfaceState>>,
}

impl PointerSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> PointerCursor {
        self.state.get().cursor
    }

    /// Whether content components must ignore text-selection gestures.
    pub fn selection_suppressed(&self) -> bool {
        self.state.get().selection_suppressed
    }

    /// Route pointer input to `window` until the returned capture is
    /// dropped.
    pub fn capture(&self, window: WindowId, mode: InteractionMode) -> PointerCapture {
        self.state.set(SurfaceState {
            cursor: mode.into(),
            selection_suppressed: true,
        });
        tracing::debug!(window_id = %window, ?mode, "pointer captured");
        PointerCapture {
            window,
            mode,
            surface: self.clone(),
        }
    }

    fn reset(&self) {
        self.state.set(SurfaceState::default());
    }
}

/// Exclusive pointer routing held for the duration of one interaction.
#[derive(Debug)]
pub struct PointerCapture {
    window: WindowId,
    mode: InteractionMode,
    surface: PointerSurface,
}

impl PointerCapture {
    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.surface.reset();
        tracing::debug!(window_id = %self.window, mode = ?self.mode, "pointer released");
    }
}

use super::decorator::HitZone;
use super::pointer::{InteractionMode, PointerTracker, PointerUpdate};
use super::{Point, Size, WindowId, WindowSeed};
use crate::constants::CLOSE_TRANSITION_TICKS;

/// Requests an instance sends up to the desktop. Instances never touch the
/// window manager directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceEvent {
    Focus(WindowId),
    Minimize(WindowId),
    Close(WindowId),
}

/// One floating window on screen.
///
/// Position and size are seeded once from the manager's record and owned
/// here from then on. The manager never resets them, so they live exactly
/// as long as the instance.
#[derive(Debug, Clone)]
pub struct WindowInstance {
    id: WindowId,
    position: Point,
    size: Size,
    tracker: PointerTracker,
    // ticks left in the closing transition
    closing: Option<u8>,
    close_emitted: bool,
}

impl WindowInstance {
    pub fn new(id: WindowId, seed: WindowSeed) -> Self {
        Self {
            id,
            position: seed.position,
            size: seed.size,
            tracker: PointerTracker::default(),
            closing: None,
            close_emitted: false,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn interaction(&self) -> Option<InteractionMode> {
        self.tracker.mode()
    }

    pub fn is_closing(&self) -> bool {
        self.closing.is_some()
    }

    /// Fraction of the closing transition already played, from 0.0 to 1.0.
    pub fn closing_progress(&self) -> Option<f32> {
        self.closing.map(|remaining| {
            let total = f32::from(CLOSE_TRANSITION_TICKS.max(1));
            1.0 - f32::from(remaining) / total
        })
    }

    /// Handle a press at `pointer` (desktop units) that landed on `zone`.
    /// A press always ends an interaction whose release never arrived.
    pub fn pointer_down(&mut self, zone: HitZone, pointer: Point) -> Vec<InstanceEvent> {
        if self.is_closing() {
            return Vec::new();
        }
        self.tracker.end();
        match zone {
            HitZone::TitleBar => {
                self.tracker.begin_drag(pointer, self.position);
                vec![InstanceEvent::Focus(self.id)]
            }
            HitZone::ResizeHandle => {
                self.tracker.begin_resize(pointer, self.size);
                Vec::new()
            }
            HitZone::MinimizeButton => vec![InstanceEvent::Minimize(self.id)],
            HitZone::CloseButton => {
                self.request_close();
                Vec::new()
            }
            HitZone::Body => vec![InstanceEvent::Focus(self.id)],
            HitZone::Outside => Vec::new(),
        }
    }

    /// Apply a pointer move. Returns `true` when geometry changed.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        if self.is_closing() {
            return false;
        }
        match self.tracker.update(pointer) {
            Some(PointerUpdate::Move(position)) => {
                let changed = position != self.position;
                self.position = position;
                changed
            }
            Some(PointerUpdate::Resize(size)) => {
                let changed = size != self.size;
                self.size = size;
                changed
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) -> Option<InteractionMode> {
        self.tracker.end()
    }

    /// Start the closing transition. Any running interaction ends here.
    pub fn request_close(&mut self) {
        if self.is_closing() {
            return;
        }
        self.tracker.end();
        self.closing = Some(CLOSE_TRANSITION_TICKS);
        tracing::debug!(window_id = %self.id, "close requested");
    }

    /// Advance the closing transition by one frame. Emits `Close` exactly
    /// once, on the tick the transition finishes.
    pub fn tick(&mut self) -> Option<InstanceEvent> {
        let remaining = self.closing.as_mut()?;
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 && !self.close_emitted {
            self.close_emitted = true;
            return Some(InstanceEvent::Close(self.id));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> WindowInstance {
        WindowInstance::new(
            WindowId::new(3),
            WindowSeed {
                position: Point::new(50, 50),
                size: Size::new(600, 450),
            },
        )
    }

    #[test]
    fn title_bar_press_focuses_and_drags() {
        let mut win = instance();
        let events = win.pointer_down(HitZone::TitleBar, Point::new(100, 100));
        assert_eq!(events, vec![InstanceEvent::Focus(WindowId::new(3))]);
        assert!(win.pointer_move(Point::new(120, 130)));
        assert_eq!(win.position(), Point::new(70, 80));
        assert_eq!(win.pointer_up(), Some(InteractionMode::Drag));
        assert!(!win.pointer_move(Point::new(500, 500)));
        assert_eq!(win.position(), Point::new(70, 80));
    }

    #[test]
    fn resize_handle_does_not_focus() {
        let mut win = instance();
        let events = win.pointer_down(HitZone::ResizeHandle, Point::new(300, 300));
        assert!(events.is_empty());
        win.pointer_move(Point::new(250, 300));
        assert_eq!(win.size(), Size::new(550, 450));
        win.pointer_move(Point::new(100, 100));
        assert_eq!(win.size(), Size::new(400, 300));
        assert_eq!(win.position(), Point::new(50, 50));
    }

    #[test]
    fn controls_emit_events() {
        let mut win = instance();
        assert_eq!(
            win.pointer_down(HitZone::MinimizeButton, Point::default()),
            vec![InstanceEvent::Minimize(WindowId::new(3))]
        );
        assert_eq!(
            win.pointer_down(HitZone::Body, Point::default()),
            vec![InstanceEvent::Focus(WindowId::new(3))]
        );
        assert!(win.pointer_down(HitZone::CloseButton, Point::default()).is_empty());
        assert!(win.is_closing());
    }

    #[test]
    fn close_is_emitted_once_after_transition() {
        let mut win = instance();
        win.request_close();
        let mut emitted = Vec::new();
        for _ in 0..(CLOSE_TRANSITION_TICKS as usize + 4) {
            if let Some(event) = win.tick() {
                emitted.push(event);
            }
        }
        assert_eq!(emitted, vec![InstanceEvent::Close(WindowId::new(3))]);
        assert_eq!(win.closing_progress(), Some(1.0));
    }

    #[test]
    fn idle_instance_tick_is_silent() {
        let mut win = instance();
        assert_eq!(win.tick(), None);
        assert_eq!(win.closing_progress(), None);
    }

    #[test]
    fn second_press_without_release_regrabs() {
        let mut win = instance();
        win.pointer_down(HitZone::TitleBar, Point::new(60, 60));
        win.pointer_down(HitZone::TitleBar, Point::new(200, 60));
        win.pointer_move(Point::new(210, 60));
        assert_eq!(win.position(), Point::new(60, 50));

        win.pointer_down(HitZone::ResizeHandle, Point::new(650, 500));
        assert_eq!(win.interaction(), Some(InteractionMode::Resize));
        win.pointer_move(Point::new(700, 500));
        assert_eq!(win.position(), Point::new(60, 50));
        assert_eq!(win.size(), Size::new(650, 450));
    }

    #[test]
    fn closing_instance_ignores_pointer_input() {
        let mut win = instance();
        win.pointer_down(HitZone::TitleBar, Point::new(60, 60));
        win.request_close();
        assert_eq!(win.interaction(), None);
        assert!(win.pointer_down(HitZone::Body, Point::default()).is_empty());
        assert!(!win.pointer_move(Point::new(400, 400)));
        assert_eq!(win.position(), Point::new(50, 50));
    }
}

use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::apps::AppId;
use crate::ui::UiFrame;

pub mod input_line;
pub mod list;

pub use input_line::{InputLine, InputOutcome};
pub use list::ListComponent;

pub use crate::component_context::ComponentContext;

/// Something a hosted component asks the desktop to do on its behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    Open(AppId),
}

/// Content drawn inside a window.
///
/// Components render into an offscreen buffer whose origin is the top-left
/// of the window's content area, and mouse events reach them translated to
/// the same local coordinates.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }

    /// Advance timers by one frame.
    fn tick(&mut self) {}

    fn take_requests(&mut self) -> Vec<HostRequest> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::UiFrame;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::prelude::Rect;

    struct DummyComp;
    impl Component for DummyComp {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }

    #[test]
    fn default_handle_event_returns_false() {
        let mut d = DummyComp;
        assert!(!d.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            &ComponentContext::default()
        ));
        assert!(d.take_requests().is_empty());
    }
}

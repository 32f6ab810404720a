use ratatui::style::{Modifier, Style};

use super::FloatRect;
use crate::theme;
use crate::ui::{UiFrame, truncate_to_width};

const MINIMIZE_LABEL: &str = "[_]";
const CLOSE_LABEL: &str = "[X]";
const RESIZE_GLYPH: &str = "◢";

/// Region of a window frame under a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    TitleBar,
    MinimizeButton,
    CloseButton,
    ResizeHandle,
    Body,
    Outside,
}

/// Per-frame inputs for drawing one window's chrome.
#[derive(Debug, Clone, Copy)]
pub struct DecorationState<'a> {
    pub title: &'a str,
    pub z_index: u64,
    pub focused: bool,
    /// Fraction of the closing transition played so far.
    pub closing: Option<f32>,
}

pub trait WindowDecorator: std::fmt::Debug {
    /// Draw borders, title bar, controls and resize handle for `rect`.
    /// Content is drawn separately into `content_rect(rect)`.
    fn render_window(&self, frame: &mut UiFrame<'_>, rect: FloatRect, state: DecorationState<'_>);

    fn hit_test(&self, rect: FloatRect, column: u16, row: u16) -> HitZone;

    fn content_rect(&self, rect: FloatRect) -> FloatRect {
        rect.inner()
    }
}

/// Orange-on-black MAGI window chrome.
///
/// ```text
///  WIN_ID:003 // MAGI_SYS    [_][X]
/// │                                 │
/// └────────────────────────────────◢┘
/// ```
#[derive(Debug, Default)]
pub struct MagiDecorator;

impl MagiDecorator {
    // Columns of the two controls, relative to the window's left edge.
    fn control_columns(width: u16) -> Option<(i32, i32)> {
        let width = width as i32;
        let close = width - 1 - CLOSE_LABEL.len() as i32;
        let minimize = close - MINIMIZE_LABEL.len() as i32;
        (minimize > 1).then_some((minimize, close))
    }
}

impl WindowDecorator for MagiDecorator {
    fn render_window(&self, frame: &mut UiFrame<'_>, rect: FloatRect, state: DecorationState<'_>) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let border_color = if state.closing.is_some() {
            theme::decorator_closing()
        } else {
            theme::decorator_border()
        };
        let border = Style::default().fg(border_color).bg(theme::desktop_bg());
        let header = if state.focused {
            Style::default()
                .bg(theme::decorator_header_bg())
                .fg(theme::decorator_header_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::decorator_inactive_header_bg())
                .fg(theme::decorator_header_fg())
        };

        let (x0, y0) = (rect.x, rect.y);
        let right = rect.width as i32 - 1;
        let bottom = rect.height as i32 - 1;

        // Title bar
        frame.put_str(x0, y0, &" ".repeat(rect.width as usize), header);
        let title = format!("WIN_ID:{:03} // {}", state.z_index, state.title);
        let controls = Self::control_columns(rect.width);
        let title_room = match controls {
            Some((minimize, _)) => (minimize - 2).max(0) as usize,
            None => (right - 1).max(0) as usize,
        };
        frame.put_str(x0 + 1, y0, truncate_to_width(&title, title_room), header);
        if let Some((minimize, close)) = controls {
            frame.put_str(x0 + minimize, y0, MINIMIZE_LABEL, header);
            frame.put_str(x0 + close, y0, CLOSE_LABEL, header);
        }

        // Frame
        for dy in 1..bottom {
            frame.put_str(x0, y0 + dy, "│", border);
            frame.put_str(x0 + right, y0 + dy, "│", border);
        }
        let base = match right {
            1 => format!("{RESIZE_GLYPH}┘"),
            _ => format!("└{}{RESIZE_GLYPH}┘", "─".repeat((right - 2) as usize)),
        };
        frame.put_str(x0, y0 + bottom, &base, border);
    }

    fn hit_test(&self, rect: FloatRect, column: u16, row: u16) -> HitZone {
        if !rect.contains(column, row) {
            return HitZone::Outside;
        }
        let dx = column as i32 - rect.x;
        let dy = row as i32 - rect.y;
        let right = rect.width as i32 - 1;
        let bottom = rect.height as i32 - 1;
        if dy == bottom && dx >= right - 1 {
            return HitZone::ResizeHandle;
        }
        if dy == 0 {
            if let Some((minimize, close)) = Self::control_columns(rect.width) {
                if (close..close + CLOSE_LABEL.len() as i32).contains(&dx) {
                    return HitZone::CloseButton;
                }
                if (minimize..minimize + MINIMIZE_LABEL.len() as i32).contains(&dx) {
                    return HitZone::MinimizeButton;
                }
            }
            return HitZone::TitleBar;
        }
        HitZone::Body
    }
}

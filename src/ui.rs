//! Cell-level drawing for window chrome, the panel and hosted components.
//!
//! All text helpers measure display width rather than `char` count. Labels
//! switch to double-width glyphs under the Chinese locale, and a glyph is
//! either drawn whole or not at all.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{StatefulWidget, Widget};

use crate::window::FloatRect;

/// Clipped view of a terminal buffer.
///
/// Nothing drawn through a `UiFrame` lands outside [`UiFrame::area`], even
/// when callers pass rectangles or origins that hang off the edge.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        Self::from_parts(area, frame.buffer_mut())
    }

    /// Offscreen window content and tests draw straight into a buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        (!clipped.is_empty()).then_some(clipped)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        if let Some(area) = self.clip(area) {
            widget.render(area, self.buffer);
        }
    }

    pub fn render_stateful_widget<W: StatefulWidget>(
        &mut self,
        widget: W,
        area: Rect,
        state: &mut W::State,
    ) {
        if let Some(area) = self.clip(area) {
            widget.render(area, self.buffer, state);
        }
    }

    /// Write `text` with its first cell at a possibly negative `(x, y)`.
    /// Glyphs that would straddle an edge of the frame are skipped. Returns
    /// the column just past the text.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) -> i32 {
        let row_visible = y >= self.area.top() as i32 && y < self.area.bottom() as i32;
        let left = self.area.left() as i32;
        let right = self.area.right() as i32;
        let mut column = x;
        for (start, ch) in text.char_indices() {
            let glyph = &text[start..start + ch.len_utf8()];
            let width = display_width(glyph) as i32;
            if width == 0 {
                continue;
            }
            if row_visible && column >= left && column + width <= right {
                self.buffer.set_string(column as u16, y as u16, glyph, style);
            }
            column += width;
        }
        column
    }

    /// Copy `src`, whose top-left cell is local (0, 0), onto `dest`.
    pub fn composite(&mut self, src: &Buffer, dest: FloatRect) {
        let visible = dest.visible(self.area);
        for y in visible.top()..visible.bottom() {
            for x in visible.left()..visible.right() {
                let local = ((x as i32 - dest.x) as u16, (y as i32 - dest.y) as u16);
                if let (Some(from), Some(to)) = (src.cell(local), self.buffer.cell_mut((x, y))) {
                    *to = from.clone();
                }
            }
        }
    }
}

/// Terminal cells `text` occupies.
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Longest prefix of `value` that fits in `width` cells.
pub fn truncate_to_width(value: &str, width: usize) -> &str {
    let mut used = 0;
    for (start, ch) in value.char_indices() {
        let end = start + ch.len_utf8();
        used += display_width(&value[start..end]);
        if used > width {
            return &value[..start];
        }
    }
    value
}

/// `Buffer::set_stringn` that silently ignores origins outside `bounds`.
pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if !bounds.contains((x, y).into()) {
        return;
    }
    let room = bounds.right().saturating_sub(x) as usize;
    buffer.set_stringn(x, y, text, room, style);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: u16, height: u16, symbol: &str) -> Buffer {
        let mut buffer = Buffer::empty(Rect::new(0, 0, width, height));
        for y in 0..height {
            for x in 0..width {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                }
            }
        }
        buffer
    }

    fn symbol(buffer: &Buffer, x: u16, y: u16) -> &str {
        buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or("")
    }

    #[test]
    fn composite_shifts_by_negative_origin() {
        let area = Rect::new(0, 0, 4, 2);
        let mut dest = Buffer::empty(area);
        let mut src = filled(3, 2, "#");
        src.set_string(0, 0, "abc", Style::default());
        UiFrame::from_parts(area, &mut dest).composite(
            &src,
            FloatRect {
                x: -1,
                y: 0,
                width: 3,
                height: 2,
            },
        );
        assert_eq!(symbol(&dest, 0, 0), "b");
        assert_eq!(symbol(&dest, 1, 0), "c");
        assert_eq!(symbol(&dest, 1, 1), "#");
        assert_eq!(symbol(&dest, 2, 0), " ");
    }

    #[test]
    fn composite_outside_frame_draws_nothing() {
        let area = Rect::new(0, 0, 3, 3);
        let mut dest = Buffer::empty(area);
        UiFrame::from_parts(area, &mut dest).composite(
            &filled(2, 2, "#"),
            FloatRect {
                x: -5,
                y: -5,
                width: 2,
                height: 2,
            },
        );
        assert_eq!(dest, Buffer::empty(area));
    }

    #[test]
    fn put_str_gives_wide_glyphs_two_cells() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buffer = Buffer::empty(area);
        let end = UiFrame::from_parts(area, &mut buffer).put_str(1, 0, "数据a", Style::default());
        assert_eq!(end, 6);
        assert_eq!(symbol(&buffer, 1, 0), "数");
        assert_eq!(symbol(&buffer, 3, 0), "据");
        assert_eq!(symbol(&buffer, 5, 0), "a");
    }

    #[test]
    fn put_str_skips_glyphs_cut_by_the_edges() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        frame.put_str(-1, 0, "数ab数", Style::default());
        frame.put_str(0, 3, "hidden", Style::default());
        assert_eq!(symbol(&buffer, 0, 0), " ");
        assert_eq!(symbol(&buffer, 1, 0), "a");
        assert_eq!(symbol(&buffer, 2, 0), "b");
        assert_eq!(symbol(&buffer, 3, 0), " ");
    }

    #[test]
    fn truncate_to_width_counts_cells() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
        assert_eq!(truncate_to_width("数据档案", 5), "数据");
        assert_eq!(display_width("数据档案"), 8);
    }

    #[test]
    fn safe_set_string_stops_at_bounds() {
        let bounds = Rect::new(0, 0, 4, 1);
        let mut buffer = Buffer::empty(bounds);
        safe_set_string(&mut buffer, bounds, 1, 0, "hello", Style::default());
        safe_set_string(&mut buffer, bounds, 9, 0, "x", Style::default());
        assert_eq!(symbol(&buffer, 1, 0), "h");
        assert_eq!(symbol(&buffer, 3, 0), "l");
    }

    #[test]
    fn widgets_are_clipped_to_the_frame() {
        struct Fill;
        impl Widget for Fill {
            fn render(self, area: Rect, buf: &mut Buffer) {
                buf.set_string(area.x, area.y, "A".repeat(area.width as usize), Style::default());
            }
        }

        let area = Rect::new(0, 0, 5, 3);
        let mut buffer = Buffer::empty(area);
        UiFrame::from_parts(area, &mut buffer).render_widget(Fill, Rect::new(3, 1, 5, 2));
        assert_eq!(symbol(&buffer, 2, 1), " ");
        assert_eq!(symbol(&buffer, 3, 1), "A");
        assert_eq!(symbol(&buffer, 4, 1), "A");
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::components::ComponentContext;
use crate::ui::{UiFrame, display_width, safe_set_string};

/// Result of feeding one key to an [`InputLine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    Edited,
    Submitted(String),
}

/// Single-line text entry with a cursor.
#[derive(Debug, Default, Clone)]
pub struct InputLine {
    text: String,
    // cursor position in chars
    cursor: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputOutcome {
        if key.kind != KeyEventKind::Press {
            return InputOutcome::Ignored;
        }
        match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, ch);
                self.cursor += 1;
                InputOutcome::Edited
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                InputOutcome::Edited
            }
            KeyCode::Delete if self.cursor < self.text.chars().count() => {
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                InputOutcome::Edited
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputOutcome::Edited
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.text.chars().count());
                InputOutcome::Edited
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputOutcome::Edited
            }
            KeyCode::End => {
                self.cursor = self.text.chars().count();
                InputOutcome::Edited
            }
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.text);
                self.cursor = 0;
                InputOutcome::Submitted(text)
            }
            _ => InputOutcome::Ignored,
        }
    }

    /// Draw `prompt` followed by the text, scrolled so the cursor stays
    /// visible.
    pub fn render(
        &self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        prompt: &str,
        placeholder: &str,
        ctx: &ComponentContext,
    ) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = Style::default().fg(ctx.accent());
        let prompt_width = display_width(prompt) as u16;
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y,
            prompt,
            style.add_modifier(Modifier::BOLD),
        );
        let field_x = area.x.saturating_add(prompt_width);
        let field_width = area.width.saturating_sub(prompt_width) as usize;
        if field_width == 0 {
            return;
        }
        if self.text.is_empty() {
            safe_set_string(
                buffer,
                bounds,
                field_x,
                area.y,
                placeholder,
                style.add_modifier(Modifier::DIM),
            );
        }
        let skip = (self.cursor + 1).saturating_sub(field_width);
        let visible: String = self.text.chars().skip(skip).take(field_width).collect();
        safe_set_string(buffer, bounds, field_x, area.y, &visible, style);
        if ctx.focused() {
            let cursor_x = field_x.saturating_add((self.cursor - skip) as u16);
            if cursor_x < bounds.x.saturating_add(bounds.width)
                && let Some(cell) = buffer.cell_mut((cursor_x, area.y))
            {
                cell.set_style(style.add_modifier(Modifier::REVERSED));
            }
        }
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(line: &mut InputLine, text: &str) {
        for ch in text.chars() {
            line.handle_key(&key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn typing_and_submitting() {
        let mut line = InputLine::new();
        type_str(&mut line, "ls -a");
        assert_eq!(line.text(), "ls -a");
        assert_eq!(
            line.handle_key(&key(KeyCode::Enter)),
            InputOutcome::Submitted("ls -a".to_string())
        );
        assert_eq!(line.text(), "");
    }

    #[test]
    fn editing_in_the_middle_handles_multibyte() {
        let mut line = InputLine::new();
        type_str(&mut line, "终端");
        line.handle_key(&key(KeyCode::Left));
        type_str(&mut line, "x");
        assert_eq!(line.text(), "终x端");
        line.handle_key(&key(KeyCode::Backspace));
        line.handle_key(&key(KeyCode::Delete));
        assert_eq!(line.text(), "终");
    }

    #[test]
    fn control_chords_are_ignored() {
        let mut line = InputLine::new();
        let chord = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(line.handle_key(&chord), InputOutcome::Ignored);
        assert_eq!(line.handle_key(&key(KeyCode::Backspace)), InputOutcome::Ignored);
    }
}

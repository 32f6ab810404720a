use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState};

use crate::components::{Component, ComponentContext};
use crate::layout::rect_contains;
use crate::ui::UiFrame;

/// Scrolling single-selection list shared by the hosted applications.
#[derive(Debug, Default)]
pub struct ListComponent {
    items: Vec<String>,
    selected: usize,
    offset: usize,
    // area from the last render, for mouse hit-testing
    area: Rect,
    // set when a click lands on the already-selected row
    activated: bool,
}

impl ListComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn set_selected(&mut self, selected: usize) {
        self.selected = selected.min(self.items.len().saturating_sub(1));
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            self.selected = 0;
            return;
        }
        if delta.is_negative() {
            self.selected = self.selected.saturating_sub(delta.unsigned_abs());
        } else {
            self.selected = (self.selected + delta as usize).min(self.items.len() - 1);
        }
    }

    /// Returns `true` once after a click on the row that was already
    /// selected, the terminal stand-in for a double click.
    pub fn take_activation(&mut self) -> bool {
        std::mem::take(&mut self.activated)
    }

    fn keep_selected_in_view(&mut self, view: usize) {
        if view == 0 || self.items.is_empty() {
            self.offset = 0;
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + view {
            self.offset = self.selected + 1 - view;
        }
    }
}

impl Component for ListComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.area = area;
        if area.height == 0 || area.width == 0 {
            return;
        }
        let view = area.height as usize;
        self.keep_selected_in_view(view);
        let items = self
            .items
            .iter()
            .skip(self.offset)
            .take(view)
            .map(|item| ListItem::new(item.clone()))
            .collect::<Vec<_>>();
        let mut state = ListState::default();
        if !self.items.is_empty() && self.selected >= self.offset {
            state.select(Some(self.selected - self.offset));
        }
        let highlight = if ctx.focused() {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        };
        let list = List::new(items)
            .style(Style::default().fg(ctx.accent()))
            .highlight_style(highlight);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection(-1);
                    true
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection(1);
                    true
                }
                KeyCode::PageUp => {
                    self.move_selection(-5);
                    true
                }
                KeyCode::PageDown => {
                    self.move_selection(5);
                    true
                }
                KeyCode::Home => {
                    self.selected = 0;
                    true
                }
                KeyCode::End => {
                    self.selected = self.items.len().saturating_sub(1);
                    true
                }
                _ => false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left)
                    if rect_contains(self.area, mouse.column, mouse.row) =>
                {
                    let index = self.offset + (mouse.row - self.area.y) as usize;
                    if index < self.items.len() {
                        self.activated = index == self.selected;
                        self.selected = index;
                    }
                    true
                }
                MouseEventKind::ScrollUp => {
                    self.move_selection(-1);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.move_selection(1);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn list_of(n: usize) -> ListComponent {
        let mut list = ListComponent::new();
        list.set_items((0..n).map(|i| format!("item {i}")).collect());
        list
    }

    #[test]
    fn selection_moves_with_keys() {
        let mut list = list_of(3);
        let ctx = ComponentContext::default();
        list.handle_event(&key_event(KeyCode::Down), &ctx);
        assert_eq!(list.selected(), 1);
        list.handle_event(&key_event(KeyCode::Up), &ctx);
        assert_eq!(list.selected(), 0);
        list.handle_event(&key_event(KeyCode::End), &ctx);
        assert_eq!(list.selected(), 2);
    }

    #[test]
    fn click_selects_then_activates() {
        let mut list = list_of(10);
        let ctx = ComponentContext::default();
        let area = Rect::new(0, 0, 12, 4);
        let mut buffer = Buffer::empty(area);
        list.render(&mut UiFrame::from_parts(area, &mut buffer), area, &ctx);
        list.handle_event(&click(2, 2), &ctx);
        assert_eq!(list.selected(), 2);
        assert!(!list.take_activation());
        list.handle_event(&click(2, 2), &ctx);
        assert!(list.take_activation());
        assert!(!list.take_activation());
    }

    #[test]
    fn render_scrolls_selection_into_view() {
        let mut list = list_of(10);
        let ctx = ComponentContext::default();
        list.set_selected(8);
        let area = Rect::new(0, 0, 12, 3);
        let mut buffer = Buffer::empty(area);
        list.render(&mut UiFrame::from_parts(area, &mut buffer), area, &ctx);
        let first_row: String = (0..6u16)
            .map(|x| buffer.cell((x, 0)).map(|c| c.symbol()).unwrap_or(" "))
            .collect();
        assert_eq!(first_row, "item 6");
    }
}

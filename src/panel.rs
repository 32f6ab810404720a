use crossterm::event::{Event, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use crate::apps::AppId;
use crate::layout::RegionMap;
use crate::locale::Locale;
use crate::theme;
use crate::ui::{UiFrame, display_width, safe_set_string, truncate_to_width};
use crate::window::{PointerCursor, WindowId};

/// Clickable panel element under a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PanelHit {
    Launch(AppId),
    ToggleEmergency,
    ToggleLocale,
    Window(WindowId),
}

/// One taskbar button.
#[derive(Debug, Clone)]
pub struct TaskbarEntry<'a> {
    pub id: WindowId,
    pub title: &'a str,
    pub active: bool,
    pub minimized: bool,
}

/// Everything the panel shows for one frame.
#[derive(Debug, Clone)]
pub struct PanelView<'a> {
    pub locale: Locale,
    pub emergency: bool,
    pub entries: Vec<TaskbarEntry<'a>>,
    pub cursor: PointerCursor,
    pub mouse_capture_enabled: bool,
    pub clock: String,
}

fn launcher_label(index: usize, app: AppId) -> String {
    let name = match app {
        AppId::Files => "ARCHIVES",
        other => other.as_str(),
    };
    format!("{:02} {name}", index + 1)
}

#[derive(Debug, Default)]
pub struct Panel {
    top: Rect,
    bottom: Rect,
    regions: RegionMap<PanelHit>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.regions.clear();
    }

    pub fn top_area(&self) -> Rect {
        self.top
    }

    pub fn bottom_area(&self) -> Rect {
        self.bottom
    }

    /// Split `area` into the top bar (one row), the taskbar (one row) and
    /// the desktop in between, which is returned last.
    pub fn split_area(&mut self, area: Rect) -> (Rect, Rect, Rect) {
        let top_h = 1u16.min(area.height);
        let bottom_h = 1u16.min(area.height.saturating_sub(top_h));
        let top = Rect {
            height: top_h,
            ..area
        };
        let bottom = Rect {
            y: area.y.saturating_add(area.height).saturating_sub(bottom_h),
            height: bottom_h,
            ..area
        };
        let managed = Rect {
            y: area.y.saturating_add(top_h),
            height: area.height.saturating_sub(top_h).saturating_sub(bottom_h),
            ..area
        };
        self.top = top;
        self.bottom = bottom;
        (top, bottom, managed)
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, view: &PanelView<'_>) {
        self.begin_frame();
        let buffer = frame.buffer_mut();
        self.render_top(buffer, view);
        self.render_bottom(buffer, view);
    }

    fn render_top(&mut self, buffer: &mut Buffer, view: &PanelView<'_>) {
        let area = self.top;
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let accent = accent_color(view.emergency);
        let base = Style::default().bg(theme::panel_bg()).fg(accent);
        let active = Style::default()
            .bg(accent)
            .fg(theme::panel_active_fg())
            .add_modifier(Modifier::BOLD);
        fill(buffer, bounds, base);
        let text = view.locale.strings();
        let max_x = area.x.saturating_add(area.width);

        // Right-hand cluster first so the launcher can truncate against it.
        let clock = format!(" {} ", view.clock);
        let locale = format!("[{}]", view.locale.toggled().code());
        let emergency = if view.emergency { "[!! EMERG]" } else { "[EMERG]" };
        let right_width = text_width(&clock) + text_width(&locale) + text_width(emergency);
        let right_x = max_x.saturating_sub(right_width).max(area.x);
        let mut x = right_x;
        let emergency_style = if view.emergency {
            Style::default()
                .bg(theme::alert())
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
        } else {
            base
        };
        x = self.put_button(
            buffer,
            bounds,
            x,
            area.y,
            emergency,
            emergency_style,
            Some(PanelHit::ToggleEmergency),
        );
        x = self.put_button(buffer, bounds, x, area.y, &locale, base, Some(PanelHit::ToggleLocale));
        self.put_button(buffer, bounds, x, area.y, &clock, base, None);

        let mut x = area.x;
        let badge = format!(" ▲ {} ", text.system_name);
        x = self.put_button(buffer, bounds, x, area.y, &badge, active, None);
        x = x.saturating_add(1);
        for (index, app) in AppId::LAUNCHER.into_iter().enumerate() {
            let label = format!("[{}]", launcher_label(index, app));
            if x.saturating_add(text_width(&label)) > right_x {
                break;
            }
            let hit = Some(PanelHit::Launch(app));
            x = self.put_button(buffer, bounds, x, area.y, &label, base, hit);
        }
    }

    fn render_bottom(&mut self, buffer: &mut Buffer, view: &PanelView<'_>) {
        let area = self.bottom;
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let accent = accent_color(view.emergency);
        let base = Style::default().bg(theme::panel_bg()).fg(accent);
        fill(buffer, bounds, base);
        let text = view.locale.strings();
        let max_x = area.x.saturating_add(area.width);

        let mode = match view.cursor {
            PointerCursor::Default => "IDLE",
            PointerCursor::Move => "MOVE",
            PointerCursor::ResizeDiagonal => "RESIZE",
        };
        let mouse = if view.mouse_capture_enabled { "" } else { " [NO MOUSE]" };
        let right = format!(" MODE:{mode}{mouse} │ {} ", text.version);
        let right_width = text_width(&right);
        let right_x = max_x.saturating_sub(right_width).max(area.x);
        safe_set_string(buffer, bounds, right_x, area.y, &right, base);

        let status = if view.emergency {
            text.status_emergency
        } else {
            text.status
        };
        let status_style = Style::default()
            .bg(accent)
            .fg(theme::panel_active_fg())
            .add_modifier(Modifier::BOLD);
        let badge = format!(" {status} ");
        let mut x = self.put_button(buffer, bounds, area.x, area.y, &badge, status_style, None);
        x = x.saturating_add(1);
        for entry in &view.entries {
            let marker = if entry.active { "▸" } else { " " };
            let room = right_x.saturating_sub(x).saturating_sub(3) as usize;
            if room == 0 {
                break;
            }
            let label = format!("{marker}{} ", truncate_to_width(entry.title, room));
            let style = if entry.active {
                Style::default()
                    .bg(theme::panel_active_bg())
                    .fg(theme::panel_active_fg())
                    .add_modifier(Modifier::BOLD)
            } else if entry.minimized {
                base.add_modifier(Modifier::DIM)
            } else {
                base
            };
            let hit = Some(PanelHit::Window(entry.id));
            x = self.put_button(buffer, bounds, x, area.y, &label, style, hit);
            x = x.saturating_add(1);
        }
    }

    // Draw `label` at (x, y), register it under `hit`, and return the
    // column after it.
    #[allow(clippy::too_many_arguments)]
    fn put_button(
        &mut self,
        buffer: &mut Buffer,
        bounds: Rect,
        x: u16,
        y: u16,
        label: &str,
        style: Style,
        hit: Option<PanelHit>,
    ) -> u16 {
        let width = text_width(label);
        safe_set_string(buffer, bounds, x, y, label, style);
        if let Some(hit) = hit {
            let visible = Rect {
                x,
                y,
                width,
                height: 1,
            }
            .intersection(bounds);
            if visible.width > 0 {
                self.regions.set(hit, visible);
            }
        }
        x.saturating_add(width)
    }

    /// Panel element under a mouse press, if any.
    pub fn hit_test(&self, event: &Event) -> Option<PanelHit> {
        let Event::Mouse(mouse) = event else {
            return None;
        };
        if !matches!(mouse.kind, MouseEventKind::Down(_)) {
            return None;
        }
        self.regions.hit_test(mouse.column, mouse.row)
    }

    pub fn region(&self, hit: PanelHit) -> Option<Rect> {
        self.regions.get(hit)
    }
}

fn accent_color(emergency: bool) -> Color {
    if emergency {
        theme::alert()
    } else {
        theme::panel_fg()
    }
}

fn text_width(text: &str) -> u16 {
    display_width(text) as u16
}

fn fill(buffer: &mut Buffer, bounds: Rect, style: Style) {
    for yy in bounds.y..bounds.y.saturating_add(bounds.height) {
        for xx in bounds.x..bounds.x.saturating_add(bounds.width) {
            if let Some(cell) = buffer.cell_mut((xx, yy)) {
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent};

    fn view(entries: Vec<TaskbarEntry<'_>>) -> PanelView<'_> {
        PanelView {
            locale: Locale::En,
            emergency: false,
            entries,
            cursor: PointerCursor::Default,
            mouse_capture_enabled: true,
            clock: "12:00:00".to_string(),
        }
    }

    fn press(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
            .collect()
    }

    #[test]
    fn split_area_reserves_one_row_each() {
        let mut p = Panel::new();
        let (top, bottom, managed) = p.split_area(Rect::new(0, 0, 10, 5));
        assert_eq!(top, Rect::new(0, 0, 10, 1));
        assert_eq!(bottom, Rect::new(0, 4, 10, 1));
        assert_eq!(managed, Rect::new(0, 1, 10, 3));
        let (_, _, tiny) = p.split_area(Rect::new(0, 0, 10, 1));
        assert_eq!(tiny.height, 0);
    }

    #[test]
    fn launcher_and_taskbar_are_clickable() {
        let area = Rect::new(0, 0, 160, 10);
        let mut buffer = Buffer::empty(area);
        let mut p = Panel::new();
        p.split_area(area);
        let entries = vec![
            TaskbarEntry {
                id: WindowId::new(1),
                title: "MAGI_SYS",
                active: true,
                minimized: false,
            },
            TaskbarEntry {
                id: WindowId::new(2),
                title: "ARCHIVES",
                active: false,
                minimized: true,
            },
        ];
        p.render(&mut UiFrame::from_parts(area, &mut buffer), &view(entries));

        let top = row_text(&buffer, 0);
        assert!(top.contains("[01 MAGI]"), "{top}");
        assert!(top.contains("[02 ARCHIVES]"), "{top}");
        assert!(top.contains("12:00:00"), "{top}");
        let bottom = row_text(&buffer, 9);
        assert!(bottom.contains("STATUS: NORMAL"), "{bottom}");
        assert!(bottom.contains("▸MAGI_SYS"), "{bottom}");
        assert!(bottom.contains("VER. 7.77"), "{bottom}");

        let launch = p.region(PanelHit::Launch(AppId::Personnel)).expect("launcher drawn");
        assert_eq!(
            p.hit_test(&press(launch.x, launch.y)),
            Some(PanelHit::Launch(AppId::Personnel))
        );
        let entry = p.region(PanelHit::Window(WindowId::new(2))).expect("entry drawn");
        assert_eq!(
            p.hit_test(&press(entry.x + 1, entry.y)),
            Some(PanelHit::Window(WindowId::new(2)))
        );
        assert_eq!(p.hit_test(&press(80, 5)), None);
    }

    #[test]
    fn emergency_switches_status_text() {
        let area = Rect::new(0, 0, 120, 3);
        let mut buffer = Buffer::empty(area);
        let mut p = Panel::new();
        p.split_area(area);
        let mut v = view(Vec::new());
        v.emergency = true;
        p.render(&mut UiFrame::from_parts(area, &mut buffer), &v);
        assert!(row_text(&buffer, 2).contains("STATUS: EMERGENCY"));
        assert!(p.region(PanelHit::ToggleEmergency).is_some());
        assert!(p.region(PanelHit::ToggleLocale).is_some());
    }
}

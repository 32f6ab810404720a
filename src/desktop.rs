//! The desktop session.
//!
//! [`Desktop`] owns the window manager, one [`WindowInstance`] and one
//! hosted component per open window, and the panel. It routes terminal
//! events to the panel, the window chrome or the application under the
//! pointer, and composes each frame from back to front.

use std::collections::BTreeMap;

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::apps::{AppHost, AppId};
use crate::components::{Component, ComponentContext, HostRequest};
use crate::config::DesktopConfig;
use crate::keybindings::{Action, KeyBindings};
use crate::layout::CellScale;
use crate::panel::{Panel, PanelHit, PanelView, TaskbarEntry};
use crate::state::AppState;
use crate::theme;
use crate::ui::UiFrame;
use crate::window::decorator::{DecorationState, HitZone, MagiDecorator, WindowDecorator};
use crate::window::{
    FloatRect, InstanceEvent, Point, PointerCapture, PointerSurface, WindowId, WindowInstance,
    WindowManager,
};

const GRID_COLUMN_STEP: u16 = 4;
const GRID_ROW_STEP: u16 = 2;

pub struct Desktop {
    manager: WindowManager,
    instances: BTreeMap<WindowId, WindowInstance>,
    components: BTreeMap<WindowId, Box<dyn Component>>,
    host: AppHost,
    decorator: Box<dyn WindowDecorator>,
    surface: PointerSurface,
    capture: Option<PointerCapture>,
    state: AppState,
    panel: Panel,
    keys: KeyBindings,
    scale: CellScale,
    desktop_area: Rect,
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop")
            .field("manager", &self.manager)
            .field("instances", &self.instances)
            .field("capture", &self.capture)
            .field("state", &self.state)
            .field("desktop_area", &self.desktop_area)
            .finish_non_exhaustive()
    }
}

impl Desktop {
    pub fn new(config: &DesktopConfig) -> Self {
        Self::with_host(config, AppHost::default())
    }

    /// Build a desktop whose applications come from `host`.
    pub fn with_host(config: &DesktopConfig, host: AppHost) -> Self {
        let locale = config.locale;
        let manager = WindowManager::new(config.sizes.clone())
            .with_title_resolver(move |app| locale.app_title(app));
        let mut desktop = Self {
            manager,
            instances: BTreeMap::new(),
            components: BTreeMap::new(),
            host,
            decorator: Box::new(MagiDecorator),
            surface: PointerSurface::new(),
            capture: None,
            state: AppState::new(config.locale),
            panel: Panel::new(),
            keys: KeyBindings::default(),
            scale: config.scale,
            desktop_area: Rect::default(),
        };
        for app in &config.open {
            desktop.open(*app);
        }
        desktop
    }

    pub fn manager(&self) -> &WindowManager {
        &self.manager
    }

    pub fn instance(&self, id: WindowId) -> Option<&WindowInstance> {
        self.instances.get(&id)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn surface(&self) -> &PointerSurface {
        &self.surface
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn key_bindings(&self) -> &KeyBindings {
        &self.keys
    }

    /// Window currently holding the pointer for a drag or resize.
    pub fn captured_window(&self) -> Option<WindowId> {
        self.capture.as_ref().map(PointerCapture::window)
    }

    /// Area between the top bar and the taskbar.
    pub fn desktop_area(&self) -> Rect {
        self.desktop_area
    }

    /// Recompute the panel and desktop areas for a terminal of `area`.
    pub fn set_viewport(&mut self, area: Rect) {
        let (_, _, managed) = self.panel.split_area(area);
        self.desktop_area = managed;
    }

    pub fn open(&mut self, app: AppId) -> WindowId {
        let id = self.manager.open(app);
        self.sync_instances();
        id
    }

    /// Cell rectangle of a window's frame, title bar included.
    pub fn window_rect(&self, id: WindowId) -> Option<FloatRect> {
        let instance = self.instances.get(&id)?;
        Some(
            self.scale
                .to_cells(instance.position(), instance.size(), self.origin()),
        )
    }

    /// Route one terminal event. Returns `true` when the session should end.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let quit = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(event, key),
            Event::Mouse(mouse) => {
                self.handle_mouse(event, mouse);
                false
            }
            Event::Resize(width, height) => {
                self.set_viewport(Rect::new(0, 0, *width, *height));
                false
            }
            _ => false,
        };
        self.settle();
        quit
    }

    /// Advance closing transitions and application timers by one frame.
    pub fn tick(&mut self) {
        let events: Vec<InstanceEvent> = self
            .instances
            .values_mut()
            .filter_map(WindowInstance::tick)
            .collect();
        for event in events {
            self.apply(event);
        }
        for component in self.components.values_mut() {
            component.tick();
        }
        self.settle();
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        self.set_viewport(frame.area());
        self.render_background(frame);

        let order: Vec<(WindowId, String, u64)> = self
            .manager
            .draw_order()
            .iter()
            .map(|record| (record.id(), record.title().to_string(), record.z_index()))
            .collect();
        for (id, title, z_index) in &order {
            self.render_window(frame, *id, title, *z_index);
        }

        let view = PanelView {
            locale: self.state.locale(),
            emergency: self.state.emergency(),
            entries: self
                .manager
                .taskbar()
                .map(|(record, active)| TaskbarEntry {
                    id: record.id(),
                    title: record.title(),
                    active,
                    minimized: record.is_minimized(),
                })
                .collect(),
            cursor: self.surface.cursor(),
            mouse_capture_enabled: self.state.mouse_capture_enabled(),
            clock: chrono::Local::now().format("%H:%M:%S").to_string(),
        };
        self.panel.render(frame, &view);
    }

    fn origin(&self) -> (u16, u16) {
        (self.desktop_area.x, self.desktop_area.y)
    }

    fn context(&self, id: WindowId) -> ComponentContext {
        ComponentContext::new(self.manager.is_active(id))
            .with_locale(self.state.locale())
            .with_emergency(self.state.emergency())
            .with_selection_suppressed(self.surface.selection_suppressed())
    }

    fn is_closing(&self, id: WindowId) -> bool {
        self.instances
            .get(&id)
            .is_some_and(WindowInstance::is_closing)
    }

    fn handle_key(&mut self, event: &Event, key: &KeyEvent) -> bool {
        if let Some(action) = self.keys.action_for_key(key) {
            return self.perform(action);
        }
        if let Some(id) = self.manager.active()
            && !self.is_closing(id)
        {
            let ctx = self.context(id);
            if let Some(component) = self.components.get_mut(&id) {
                component.handle_event(event, &ctx);
            }
        }
        false
    }

    fn perform(&mut self, action: Action) -> bool {
        tracing::debug!(%action, "desktop action");
        match action {
            Action::Quit => return true,
            Action::Launch(app) => {
                self.manager.open(app);
            }
            Action::ToggleLocale => self.state.toggle_locale(),
            Action::CycleFocus => {
                if let Some(id) = self.manager.next_in_taskbar() {
                    self.manager.focus(id);
                }
            }
            Action::ToggleEmergency => self.state.toggle_emergency(),
            Action::ToggleMouseCapture => self.state.toggle_mouse_capture(),
            Action::MinimizeActive => {
                if let Some(id) = self.manager.active() {
                    self.apply(InstanceEvent::Minimize(id));
                }
            }
            Action::CloseActive => {
                if let Some(id) = self.manager.active()
                    && let Some(instance) = self.instances.get_mut(&id)
                {
                    instance.request_close();
                }
            }
        }
        false
    }

    fn perform_panel(&mut self, hit: PanelHit) {
        tracing::debug!(?hit, "panel clicked");
        match hit {
            PanelHit::Launch(app) => {
                self.manager.open(app);
            }
            PanelHit::ToggleEmergency => self.state.toggle_emergency(),
            PanelHit::ToggleLocale => self.state.toggle_locale(),
            PanelHit::Window(id) => self.manager.focus(id),
        }
    }

    fn apply(&mut self, event: InstanceEvent) {
        match event {
            InstanceEvent::Focus(id) => self.manager.focus(id),
            InstanceEvent::Minimize(id) => {
                if let Some(instance) = self.instances.get_mut(&id) {
                    instance.pointer_up();
                }
                self.manager.minimize(id);
            }
            InstanceEvent::Close(id) => self.manager.close(id),
        }
    }

    fn handle_mouse(&mut self, event: &Event, mouse: &MouseEvent) {
        if !self.state.mouse_capture_enabled() {
            return;
        }
        let pointer = self.scale.to_units(mouse.column, mouse.row, self.origin());
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(event, mouse, pointer),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved
                if self.capture.is_some() =>
            {
                self.pointer_move(pointer)
            }
            MouseEventKind::Up(MouseButton::Left) if self.capture.is_some() => self.pointer_up(),
            _ => self.forward_mouse(mouse),
        }
    }

    fn pointer_down(&mut self, event: &Event, mouse: &MouseEvent, pointer: Point) {
        // a press while captured means the release was lost
        self.pointer_up();
        if let Some(hit) = self.panel.hit_test(event) {
            self.perform_panel(hit);
            return;
        }
        let Some((id, rect)) = self.window_at(mouse.column, mouse.row) else {
            return;
        };
        let zone = self.decorator.hit_test(rect, mouse.column, mouse.row);
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        let events = instance.pointer_down(zone, pointer);
        let mode = instance.interaction();
        for event in events {
            self.apply(event);
        }
        if let Some(mode) = mode {
            self.capture = Some(self.surface.capture(id, mode));
        }
        if zone == HitZone::Body {
            self.forward_to(id, rect, mouse);
        }
    }

    fn pointer_move(&mut self, pointer: Point) {
        let Some(id) = self.captured_window() else {
            return;
        };
        if let Some(instance) = self.instances.get_mut(&id) {
            instance.pointer_move(pointer);
        }
    }

    fn pointer_up(&mut self) {
        let Some(capture) = self.capture.take() else {
            return;
        };
        if let Some(instance) = self.instances.get_mut(&capture.window()) {
            instance.pointer_up();
        }
    }

    fn forward_mouse(&mut self, mouse: &MouseEvent) {
        if let Some((id, rect)) = self.window_at(mouse.column, mouse.row)
            && self.decorator.hit_test(rect, mouse.column, mouse.row) == HitZone::Body
        {
            self.forward_to(id, rect, mouse);
        }
    }

    /// Deliver `mouse` to a window's component in content-local cells.
    fn forward_to(&mut self, id: WindowId, rect: FloatRect, mouse: &MouseEvent) {
        if self.is_closing(id) {
            return;
        }
        let content = self.decorator.content_rect(rect);
        if !content.contains(mouse.column, mouse.row) {
            return;
        }
        let local = MouseEvent {
            column: (mouse.column as i32 - content.x) as u16,
            row: (mouse.row as i32 - content.y) as u16,
            ..*mouse
        };
        let ctx = self.context(id);
        if let Some(component) = self.components.get_mut(&id) {
            component.handle_event(&Event::Mouse(local), &ctx);
        }
    }

    /// Topmost visible window under a cell.
    fn window_at(&self, column: u16, row: u16) -> Option<(WindowId, FloatRect)> {
        self.manager
            .draw_order()
            .iter()
            .rev()
            .filter_map(|record| Some((record.id(), self.window_rect(record.id())?)))
            .find(|(_, rect)| rect.contains(column, row))
    }

    /// Apply state changes and requests produced by the last input.
    fn settle(&mut self) {
        if let Some(locale) = self.state.take_locale_change() {
            tracing::info!(%locale, "locale changed");
            self.manager.rename_all(move |app| locale.app_title(app));
        }
        let requests: Vec<HostRequest> = self
            .components
            .values_mut()
            .flat_map(|component| component.take_requests())
            .collect();
        for request in requests {
            match request {
                HostRequest::Open(app) => {
                    self.manager.open(app);
                }
            }
        }
        self.sync_instances();
    }

    /// Create instances and components for new records and drop those
    /// whose record is gone.
    fn sync_instances(&mut self) {
        let live: Vec<_> = self
            .manager
            .records()
            .iter()
            .map(|record| (record.id(), record.app(), record.seed()))
            .collect();
        self.instances
            .retain(|id, _| live.iter().any(|(live_id, ..)| live_id == id));
        self.components
            .retain(|id, _| live.iter().any(|(live_id, ..)| live_id == id));
        for (id, app, seed) in live {
            self.instances
                .entry(id)
                .or_insert_with(|| WindowInstance::new(id, seed));
            if !self.components.contains_key(&id) {
                let component = self.host.launch(app);
                self.components.insert(id, component);
            }
        }

        let stale = self.capture.as_ref().is_some_and(|capture| {
            let id = capture.window();
            self.instances
                .get(&id)
                .is_none_or(|instance| instance.interaction().is_none())
                || self
                    .manager
                    .record(id)
                    .is_none_or(|record| record.is_minimized())
        });
        if stale {
            self.capture = None;
        }
    }

    fn render_background(&self, frame: &mut UiFrame<'_>) {
        let area = self.desktop_area.intersection(frame.area());
        if area.is_empty() {
            return;
        }
        let grid = if self.state.emergency() {
            theme::desktop_grid_alert()
        } else {
            theme::desktop_grid()
        };
        let style = Style::default().bg(theme::desktop_bg()).fg(grid);
        let buffer = frame.buffer_mut();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let on_grid =
                    (x - area.x) % GRID_COLUMN_STEP == 0 && (y - area.y) % GRID_ROW_STEP == 0;
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_symbol(if on_grid { "·" } else { " " });
                    cell.set_style(style);
                }
            }
        }

        let text = self.state.locale().strings();
        let watermark = Rect {
            y: area.bottom().saturating_sub(3).max(area.y),
            height: 3.min(area.height),
            width: area.width.saturating_sub(1),
            ..area
        };
        let lines = vec![
            Line::from(text.operations),
            Line::from(text.geofront),
            Line::from(text.priority),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Right)
                .style(Style::default().fg(grid).add_modifier(Modifier::BOLD)),
            watermark,
        );
    }

    fn render_window(&mut self, frame: &mut UiFrame<'_>, id: WindowId, title: &str, z_index: u64) {
        let Some(rect) = self.window_rect(id) else {
            return;
        };
        let closing = self.instances.get(&id).and_then(WindowInstance::closing_progress);
        self.decorator.render_window(
            frame,
            rect,
            DecorationState {
                title,
                z_index,
                focused: self.manager.is_active(id),
                closing,
            },
        );

        let content = self.decorator.content_rect(rect);
        if content.width == 0 || content.height == 0 {
            return;
        }
        let ctx = self.context(id);
        let local = Rect::new(0, 0, content.width, content.height);
        let mut buffer = Buffer::empty(local);
        buffer.set_style(
            local,
            Style::default().bg(theme::content_bg()).fg(ctx.accent()),
        );
        if let Some(component) = self.components.get_mut(&id) {
            let mut offscreen = UiFrame::from_parts(local, &mut buffer);
            component.render(&mut offscreen, local, &ctx);
        }
        if closing.is_some() {
            buffer.set_style(local, Style::default().add_modifier(Modifier::DIM));
        }
        frame.composite(&buffer, content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn desktop() -> Desktop {
        let mut desktop = Desktop::new(&DesktopConfig::default());
        desktop.set_viewport(Rect::new(0, 0, 160, 50));
        desktop
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn viewport_leaves_rows_for_both_bars() {
        let desktop = desktop();
        assert_eq!(desktop.desktop_area(), Rect::new(0, 1, 160, 48));
    }

    #[test]
    fn open_creates_instance_and_focuses() {
        let mut desktop = desktop();
        let id = desktop.open(AppId::Magi);
        assert_eq!(desktop.manager().active(), Some(id));
        let rect = desktop.window_rect(id).expect("instance exists");
        assert_eq!(rect, FloatRect { x: 30, y: 5, width: 90, height: 28 });
    }

    #[test]
    fn title_drag_moves_window_and_releases_capture() {
        let mut desktop = desktop();
        let id = desktop.open(AppId::Magi);
        desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 40, 5));
        assert_eq!(desktop.captured_window(), Some(id));
        assert!(desktop.surface().selection_suppressed());

        desktop.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 50, 9));
        let instance = desktop.instance(id).expect("instance");
        assert_eq!(instance.position(), Point::new(400, 200));

        desktop.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 50, 9));
        assert_eq!(desktop.captured_window(), None);
        assert!(!desktop.surface().selection_suppressed());
    }

    #[test]
    fn press_after_lost_release_takes_a_fresh_grab() {
        let mut desktop = desktop();
        let id = desktop.open(AppId::Magi);
        desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 40, 5));
        desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 80, 5));
        desktop.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 81, 5));
        let instance = desktop.instance(id).expect("instance");
        assert_eq!(instance.position(), Point::new(310, 100));
        assert_eq!(desktop.captured_window(), Some(id));
    }

    #[test]
    fn press_on_other_window_ends_stale_drag() {
        let mut desktop = desktop();
        let magi = desktop.open(AppId::Magi);
        let personnel = desktop.open(AppId::Personnel);
        desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 50, 6));
        assert_eq!(desktop.captured_window(), Some(personnel));

        desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 31, 5));
        assert_eq!(desktop.captured_window(), Some(magi));
        assert_eq!(desktop.instance(personnel).and_then(|i| i.interaction()), None);
    }

    #[test]
    fn minimize_during_drag_drops_capture() {
        let mut desktop = desktop();
        let id = desktop.open(AppId::Magi);
        desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 40, 5));
        desktop.handle_event(&key(KeyCode::F(9)));
        assert!(desktop.manager().record(id).is_some_and(|r| r.is_minimized()));
        assert_eq!(desktop.captured_window(), None);
        assert_eq!(desktop.instance(id).and_then(|i| i.interaction()), None);
    }

    #[test]
    fn close_key_plays_transition_then_removes() {
        let mut desktop = desktop();
        let id = desktop.open(AppId::Personnel);
        desktop.handle_event(&key(KeyCode::F(10)));
        assert!(desktop.instance(id).is_some_and(|i| i.is_closing()));
        for _ in 0..crate::constants::CLOSE_TRANSITION_TICKS {
            desktop.tick();
        }
        assert!(desktop.manager().is_empty());
        assert!(desktop.instance(id).is_none());
    }

    #[test]
    fn locale_toggle_renames_windows() {
        let mut desktop = desktop();
        let id = desktop.open(AppId::Magi);
        desktop.handle_event(&key(KeyCode::F(5)));
        assert_eq!(desktop.manager().record(id).map(|r| r.title()), Some("MAGI_SYS"));
        let next = desktop.open(AppId::Files);
        assert_eq!(desktop.manager().record(next).map(|r| r.title()), Some("ARCHIVES"));
    }

    #[test]
    fn disabled_mouse_capture_ignores_clicks() {
        let mut desktop = desktop();
        let id = desktop.open(AppId::Magi);
        desktop.handle_event(&key(KeyCode::F(8)));
        assert_eq!(desktop.state_mut().take_mouse_capture_change(), Some(false));
        desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 117, 5));
        assert!(!desktop.instance(id).is_some_and(|i| i.is_closing()));
    }

    #[test]
    fn render_draws_chrome_and_panel() {
        let mut desktop = desktop();
        desktop.open(AppId::Personnel);
        let area = Rect::new(0, 0, 160, 50);
        let mut buffer = Buffer::empty(area);
        desktop.render(&mut UiFrame::from_parts(area, &mut buffer));
        let title_row: String = (0..160u16)
            .map(|x| buffer[(x, 5u16)].symbol().to_string())
            .collect();
        assert!(title_row.contains("WIN_ID:001"));
        assert!(desktop.panel().region(PanelHit::ToggleEmergency).is_some());
    }

    #[test]
    fn default_locale_titles_reach_the_terminal_whole() {
        let mut desktop = desktop();
        desktop.open(AppId::Files);
        let area = Rect::new(0, 0, 160, 50);
        let mut buffer = Buffer::empty(area);
        desktop.render(&mut UiFrame::from_parts(area, &mut buffer));
        let emitted: String = Buffer::empty(area)
            .diff(&buffer)
            .into_iter()
            .filter(|(_, y, _)| *y == 5)
            .map(|(_, _, cell)| cell.symbol())
            .collect();
        assert!(emitted.contains("WIN_ID:001 // 数据档案"), "{emitted}");
    }
}
